use serde::{Deserialize, Serialize};
use crate::catalog::CatalogRecord;
use crate::movie_id::MovieId;

/// A backend watchlist id, plus its catalog record once hydrated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub id: MovieId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<CatalogRecord>,
}

impl WatchlistEntry {
    pub fn hydrated(record: CatalogRecord) -> Self {
        Self { id: record.id.clone(), record: Some(record) }
    }
}
