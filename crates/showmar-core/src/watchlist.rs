//! Backend watchlist ids hydrated into catalog records.

use crate::credential::CredentialPropagator;
use crate::error::ClientError;
use crate::notify::Notifier;
use futures::future::join_all;
use showmar_models::{CatalogRecord, MovieId, WatchlistEntry};
use showmar_sources::{BackendService, CatalogService};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistPhase {
    Idle,
    FetchingIds,
    /// Ids known, records not yet fetched.
    IdsLoaded,
    HydratingRecords,
    Ready,
}

/// Keeps the displayed watchlist consistent with the backend's id list.
///
/// Nothing is shown until every id has been hydrated. Removal waits for the
/// backend before pruning local state.
pub struct WatchlistReconciler {
    backend: Arc<dyn BackendService>,
    catalog: Arc<dyn CatalogService>,
    credentials: Arc<CredentialPropagator>,
    notifier: Arc<dyn Notifier>,
    phase: WatchlistPhase,
    ids: Vec<MovieId>,
    entries: Vec<WatchlistEntry>,
}

impl WatchlistReconciler {
    pub fn new(
        backend: Arc<dyn BackendService>,
        catalog: Arc<dyn CatalogService>,
        credentials: Arc<CredentialPropagator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            catalog,
            credentials,
            notifier,
            phase: WatchlistPhase::Idle,
            ids: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn phase(&self) -> WatchlistPhase {
        self.phase
    }

    pub fn ids(&self) -> &[MovieId] {
        &self.ids
    }

    /// Hydrated records for ids still in the authoritative list, in list order.
    pub fn display(&self) -> Vec<&CatalogRecord> {
        if self.phase != WatchlistPhase::Ready {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| self.ids.contains(&entry.id))
            .filter_map(|entry| entry.record.as_ref())
            .collect()
    }

    /// Fetch ids then hydrate them. Does nothing without a credential.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.load_ids().await?;
        self.hydrate().await
    }

    pub async fn load_ids(&mut self) -> Result<(), ClientError> {
        self.reset();
        self.credentials.require()?;
        self.phase = WatchlistPhase::FetchingIds;

        match self.backend.get_watchlist().await {
            Ok(ids) => {
                let mut seen = HashSet::new();
                self.ids = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
                self.phase = WatchlistPhase::IdsLoaded;
                debug!("Watchlist has {} ids", self.ids.len());
                Ok(())
            }
            Err(e) => {
                self.reset();
                let err = ClientError::from(e);
                if !err.requires_login() {
                    warn!("Failed to fetch watchlist: {}", err);
                    self.notifier.error("Error fetching watchlist");
                }
                Err(err)
            }
        }
    }

    /// Fetch every record concurrently and publish them together.
    ///
    /// Any failed fetch fails the batch: state returns to `Idle` with an
    /// empty list and the failed ids are reported.
    pub async fn hydrate(&mut self) -> Result<(), ClientError> {
        if self.ids.is_empty() {
            self.entries.clear();
            self.phase = WatchlistPhase::Ready;
            return Ok(());
        }

        self.phase = WatchlistPhase::HydratingRecords;
        let catalog = self.catalog.clone();
        let results = join_all(self.ids.iter().map(|id| {
            let catalog = catalog.clone();
            async move { (id.clone(), catalog.get_movie(id).await) }
        }))
        .await;

        let total = results.len();
        let mut entries = Vec::with_capacity(total);
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(details) => entries.push(WatchlistEntry::hydrated(CatalogRecord::from(details))),
                Err(e) => {
                    warn!("Failed to load watchlist movie {}: {}", id, e);
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            self.reset();
            self.notifier.error("Error fetching watchlist movies");
            return Err(ClientError::Hydration { failed, total });
        }

        self.entries = entries;
        self.phase = WatchlistPhase::Ready;
        Ok(())
    }

    /// Delete on the backend, then prune locally. On failure nothing changes.
    pub async fn remove(&mut self, id: &MovieId) -> Result<(), ClientError> {
        self.credentials.require()?;

        match self.backend.remove_from_watchlist(id).await {
            Ok(()) => {
                self.ids.retain(|existing| existing != id);
                self.entries.retain(|entry| &entry.id != id);
                info!("Removed {} from watchlist", id);
                self.notifier.success("Removed from Watchlist");
                Ok(())
            }
            Err(e) => {
                let err = ClientError::from(e);
                if !err.requires_login() {
                    warn!("Failed to remove {} from watchlist: {}", id, err);
                    self.notifier.error("Failed to remove");
                }
                Err(err)
            }
        }
    }

    /// Add on the backend. The displayed list is left alone until the next load.
    pub async fn add(&self, id: &MovieId) -> Result<(), ClientError> {
        self.credentials.require()?;

        match self.backend.add_to_watchlist(id).await {
            Ok(()) => {
                self.notifier.success("Added to Watchlist");
                Ok(())
            }
            Err(e) => {
                let err = ClientError::from(e);
                if !err.requires_login() {
                    warn!("Failed to add {} to watchlist: {}", id, err);
                    self.notifier.error(&err.user_message("Error adding movie"));
                }
                Err(err)
            }
        }
    }

    /// Forget any in-flight load. Call after dropping a `load` future.
    pub fn abandon(&mut self) {
        if self.phase != WatchlistPhase::Ready {
            debug!("Abandoning watchlist load in phase {:?}", self.phase);
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.ids.clear();
        self.entries.clear();
        self.phase = WatchlistPhase::Idle;
    }
}
