use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Browsing filters. Lives only as long as the view that owns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive title substring; empty matches everything
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre_id: Option<u32>,
    /// Prefix of the textual release date, normally a 4-digit year
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub sort: SortKey,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.genre_id.is_none()
            && self.year.as_deref().map_or(true, str::is_empty)
            && self.min_rating.is_none()
            && self.sort == SortKey::None
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    None,
    PopularityDesc,
    ReleaseDateDesc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(SortKey::None),
            "popular" | "popularity" | "popularity-desc" => Ok(SortKey::PopularityDesc),
            "latest" | "release-date" | "release-date-desc" => Ok(SortKey::ReleaseDateDesc),
            other => Err(format!("Invalid sort: {}. Use 'popular', 'latest', or 'none'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_is_empty() {
        let mut spec = FilterSpec::default();
        assert!(spec.is_empty());

        spec.year = Some(String::new());
        assert!(spec.is_empty());

        spec.min_rating = Some(7.0);
        assert!(!spec.is_empty());
        spec.reset();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_sort_key_aliases() {
        assert_eq!("popular".parse::<SortKey>().unwrap(), SortKey::PopularityDesc);
        assert_eq!("latest".parse::<SortKey>().unwrap(), SortKey::ReleaseDateDesc);
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::None);
        assert!("alphabetical".parse::<SortKey>().is_err());
    }
}
