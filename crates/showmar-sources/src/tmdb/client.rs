use async_trait::async_trait;
use reqwest::Client;
use showmar_config::CatalogConfig;
use showmar_models::{CatalogDetails, CatalogRecord, Genre, MovieCategory, MovieId};
use std::sync::Arc;
use crate::error::SourceError;
use crate::http::create_http_client;
use crate::tmdb::api::{self, CatalogEndpoint};
use crate::traits::CatalogService;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    endpoint: CatalogEndpoint,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: String, language: String) -> Self {
        Self {
            client: Arc::new(create_http_client()),
            endpoint: CatalogEndpoint { base_url, api_key, language },
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.api_key.clone(), config.base_url.clone(), config.language.clone())
    }
}

#[async_trait]
impl CatalogService for TmdbClient {
    async fn list_movies(&self, category: MovieCategory, page: u32) -> Result<Vec<CatalogRecord>, SourceError> {
        api::list_movies(&self.client, &self.endpoint, category, page).await
    }

    async fn get_movie(&self, id: &MovieId) -> Result<CatalogDetails, SourceError> {
        api::get_movie(&self.client, &self.endpoint, id).await
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, SourceError> {
        api::list_genres(&self.client, &self.endpoint).await
    }
}
