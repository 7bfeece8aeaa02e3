use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::movie_id::MovieId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewAuthor {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// A review as stored by the backend. The client never builds one locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "movieId", alias = "movie_id")]
    pub movie_id: MovieId,
    #[serde(rename = "user", default)]
    pub author: Option<ReviewAuthor>,
    pub rating: u8, // 1-10
    pub comment: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReviewRecord {
    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.id.as_str())
    }

    pub fn display_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.username.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// Form state for a new review or the review under edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
}

impl ReviewDraft {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 10;

    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self { rating, comment: comment.into() }
    }

    pub fn from_record(record: &ReviewRecord) -> Self {
        Self {
            rating: record.rating,
            comment: record.comment.clone(),
        }
    }

    /// First problem that would make the backend reject this draft.
    pub fn validation_error(&self) -> Option<&'static str> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&self.rating) {
            return Some("Rating must be between 1 and 10");
        }
        if self.comment.trim().is_empty() {
            return Some("Comment cannot be empty");
        }
        None
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
