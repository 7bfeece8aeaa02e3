//! Builds the remote collaborators from configuration.

use anyhow::Result;
use showmar_config::Config;
use std::sync::Arc;
use crate::backend::BackendClient;
use crate::tmdb::TmdbClient;
use crate::traits::{BackendService, CatalogService};

/// Handles to both remote services, cheap to clone into each view.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogService>,
    pub backend: Arc<dyn BackendService>,
}

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_catalog(config: &Config) -> Result<Arc<dyn CatalogService>> {
        if !config.is_catalog_configured() {
            return Err(anyhow::anyhow!(
                "Catalog API key is missing. Set catalog.api_key in config.toml or SHOWMAR_TMDB_API_KEY"
            ));
        }
        Ok(Arc::new(TmdbClient::from_config(&config.catalog)))
    }

    pub fn create_backend(config: &Config) -> Arc<dyn BackendService> {
        Arc::new(BackendClient::from_config(&config.backend))
    }

    pub fn create_all(config: &Config) -> Result<Services> {
        config.validate()?;
        Ok(Services {
            catalog: Self::create_catalog(config)?,
            backend: Self::create_backend(config),
        })
    }
}
