use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Stable catalog identifier.
///
/// The catalog service hands out numeric ids while the backend echoes back
/// whatever the client stored, sometimes as a string. Both forms decode to the
/// same `MovieId`, and ids that are plain integers serialize back as numbers so
/// persisted snapshots keep the catalog's native shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_canonical_number(&self) -> Option<u64> {
        self.0
            .parse::<u64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl FromStr for MovieId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("movie id cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for MovieId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_canonical_number() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

struct MovieIdVisitor;

impl<'de> Visitor<'de> for MovieIdVisitor {
    type Value = MovieId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a movie id as an integer or string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MovieId, E> {
        Ok(MovieId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MovieId, E> {
        Ok(MovieId(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MovieId, E> {
        if v.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(MovieId(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MovieId, E> {
        if v.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(&v), &self));
        }
        Ok(MovieId(v))
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MovieIdVisitor)
    }
}
