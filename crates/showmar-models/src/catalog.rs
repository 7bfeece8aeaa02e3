use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::movie_id::MovieId;

/// A movie as listed by the catalog service.
///
/// Favorites persist whole snapshots of this struct, so every field the
/// catalog may omit carries a serde default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl CatalogRecord {
    /// Parsed release date. Year-only and year-month dates resolve to the
    /// first day of that period; unparseable text counts as no date.
    pub fn released_on(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_release_date)
    }

    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }

    pub fn has_genre(&self, genre_id: u32) -> bool {
        self.genre_ids.contains(&genre_id)
    }

    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path))
    }
}

/// Expanded record returned by the catalog's get-by-id endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

impl CatalogDetails {
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

impl From<CatalogDetails> for CatalogRecord {
    fn from(details: CatalogDetails) -> Self {
        Self {
            id: details.id,
            title: details.title,
            release_date: details.release_date,
            vote_average: details.vote_average,
            genre_ids: details.genres.iter().map(|g| g.id).collect(),
            poster_path: details.poster_path,
            popularity: details.popularity,
            overview: details.overview,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Catalog list endpoints the client browses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovieCategory {
    #[default]
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieCategory {
    pub fn path_segment(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top_rated",
            MovieCategory::NowPlaying => "now_playing",
            MovieCategory::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for MovieCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "popular" => Ok(MovieCategory::Popular),
            "top_rated" => Ok(MovieCategory::TopRated),
            "now_playing" => Ok(MovieCategory::NowPlaying),
            "upcoming" => Ok(MovieCategory::Upcoming),
            other => Err(format!(
                "Invalid category: {}. Use 'popular', 'top-rated', 'now-playing', or 'upcoming'",
                other
            )),
        }
    }
}

// The catalog sends "" for unknown dates and taglines.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn parse_release_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if text.len() == 4 {
        if let Ok(year) = text.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_record_from_list_payload() {
        let json = r#"{
            "adult": false,
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "genre_ids": [28, 878, 12],
            "poster_path": "/inception.jpg",
            "popularity": 92.5
        }"#;

        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, MovieId::from(27205u64));
        assert_eq!(record.release_year(), Some("2010"));
        assert!(record.has_genre(878));
        assert_eq!(
            record.poster_url("https://image.tmdb.org/t/p/w500/"),
            Some("https://image.tmdb.org/t/p/w500/inception.jpg".to_string())
        );
    }

    #[test]
    fn test_blank_release_date_is_absent() {
        let json = r#"{"id": 1, "title": "Untitled", "release_date": "", "poster_path": null}"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.release_date, None);
        assert_eq!(record.released_on(), None);
        assert_eq!(record.vote_average, None);
        assert!(record.genre_ids.is_empty());
        assert_eq!(record.poster_url("https://img"), None);
    }

    #[test]
    fn test_details_convert_to_record() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "tagline": "Welcome to the Real World.",
            "release_date": "1999-03-30",
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "vote_average": 8.2,
            "poster_path": "/matrix.jpg",
            "popularity": 80.1
        }"#;
        let details: CatalogDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.genre_names(), vec!["Action", "Science Fiction"]);

        let record = CatalogRecord::from(details);
        assert_eq!(record.genre_ids, vec![28, 878]);
        assert_eq!(record.released_on(), NaiveDate::from_ymd_opt(1999, 3, 30));
    }

    #[test]
    fn test_partial_release_dates_resolve_to_period_start() {
        let mut record: CatalogRecord = serde_json::from_str(r#"{"id": 9, "title": "Teaser", "release_date": "2024"}"#).unwrap();
        assert_eq!(record.released_on(), NaiveDate::from_ymd_opt(2024, 1, 1));

        record.release_date = Some("2024-05".to_string());
        assert_eq!(record.released_on(), NaiveDate::from_ymd_opt(2024, 5, 1));

        record.release_date = Some("soon".to_string());
        assert_eq!(record.released_on(), None);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("top-rated".parse::<MovieCategory>().unwrap(), MovieCategory::TopRated);
        assert_eq!("NOW_PLAYING".parse::<MovieCategory>().unwrap(), MovieCategory::NowPlaying);
        assert!("trending".parse::<MovieCategory>().is_err());
    }
}
