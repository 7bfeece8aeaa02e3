use crate::error::ClientError;
use showmar_config::{LocalStore, FAVORITES_KEY};
use showmar_models::{CatalogRecord, MovieId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Ordered favorites, unique by movie id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteSet(Vec<CatalogRecord>);

impl FavoriteSet {
    pub fn contains(&self, id: &MovieId) -> bool {
        self.0.iter().any(|r| &r.id == id)
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.0
    }

    pub fn ids(&self) -> Vec<MovieId> {
        self.0.iter().map(|r| r.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_records(self) -> Vec<CatalogRecord> {
        self.0
    }

    fn from_records(records: Vec<CatalogRecord>) -> Self {
        let mut seen = HashSet::new();
        Self(records.into_iter().filter(|r| seen.insert(r.id.clone())).collect())
    }
}

/// Sole writer of the `favorites` key.
///
/// Each toggle re-reads the stored set, mutates it and persists it while
/// holding `lock`, so rapid toggles never start from a stale snapshot.
pub struct FavoritesManager {
    store: Arc<dyn LocalStore>,
    lock: Mutex<()>,
}

impl FavoritesManager {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store, lock: Mutex::new(()) }
    }

    /// Current persisted set. Missing or unreadable values load as empty.
    pub fn load(&self) -> FavoriteSet {
        let Some(raw) = self.store.get(FAVORITES_KEY) else {
            return FavoriteSet::default();
        };

        match serde_json::from_str::<Vec<CatalogRecord>>(&raw) {
            Ok(records) => FavoriteSet::from_records(records),
            Err(e) => {
                warn!("Ignoring unreadable favorites ({}); starting empty", e);
                FavoriteSet::default()
            }
        }
    }

    pub fn is_favorite(&self, id: &MovieId) -> bool {
        self.load().contains(id)
    }

    /// Remove `record` if its id is present, otherwise append it.
    /// Returns the set as persisted.
    pub fn toggle(&self, record: &CatalogRecord) -> Result<FavoriteSet, ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut records = self.load().into_records();
        let before = records.len();
        records.retain(|r| r.id != record.id);
        if records.len() == before {
            debug!("Adding {} to favorites", record.id);
            records.push(record.clone());
        } else {
            debug!("Removing {} from favorites", record.id);
        }

        let encoded = serde_json::to_string(&records).map_err(|e| ClientError::Store(e.to_string()))?;
        self.store
            .set(FAVORITES_KEY, encoded)
            .map_err(|e| ClientError::Store(e.to_string()))?;

        Ok(FavoriteSet(records))
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.store
            .remove(FAVORITES_KEY)
            .map_err(|e| ClientError::Store(e.to_string()))
    }
}
