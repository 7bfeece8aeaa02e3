use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use showmar_config::BackendConfig;
use showmar_models::{
    AuthToken, LoginRequest, MovieId, ProfileUpdate, RegisterRequest, ReviewDraft, ReviewRecord,
    UserProfile,
};
use std::sync::{Arc, RwLock};
use tracing::debug;
use crate::backend::api::{self, NewReviewPayload, WatchlistAddPayload, SERVICE};
use crate::error::SourceError;
use crate::http::{create_http_client, expect_success, read_json};
use crate::traits::BackendService;

/// reqwest client for the application backend.
///
/// Clones share the bearer credential, so updating it through any handle
/// affects requests issued through all of them.
#[derive(Clone)]
pub struct BackendClient {
    client: Arc<Client>,
    base_url: String,
    auth_token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Arc::new(create_http_client()),
            base_url,
            auth_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    fn current_token(&self) -> Option<String> {
        self.auth_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!("{} {} (backend)", method, url);
        let builder = self.client.request(method, url).header("Accept", "application/json");
        match self.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, SourceError> {
        builder
            .send()
            .await
            .map_err(|e| SourceError::Transport { service: SERVICE, error: e })
    }
}

#[async_trait]
impl BackendService for BackendClient {
    fn set_auth_token(&self, token: Option<&str>) {
        let mut guard = self
            .auth_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token.map(str::to_string);
    }

    fn has_auth_token(&self) -> bool {
        self.current_token().is_some()
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, SourceError> {
        let response = self.send(self.request(Method::POST, "/auth/login").json(request)).await?;
        read_json(SERVICE, response).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthToken, SourceError> {
        let response = self.send(self.request(Method::POST, "/auth/register").json(request)).await?;
        read_json(SERVICE, response).await
    }

    async fn get_profile(&self) -> Result<UserProfile, SourceError> {
        let response = self.send(self.request(Method::GET, "/users/me")).await?;
        read_json(SERVICE, response).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), SourceError> {
        let form = api::profile_form(update).await?;
        let response = self.send(self.request(Method::PUT, "/users/profile").multipart(form)).await?;
        expect_success(SERVICE, response).await
    }

    async fn get_watchlist(&self) -> Result<Vec<MovieId>, SourceError> {
        let response = self.send(self.request(Method::GET, "/users/watchlist")).await?;
        read_json(SERVICE, response).await
    }

    async fn add_to_watchlist(&self, movie_id: &MovieId) -> Result<(), SourceError> {
        let payload = WatchlistAddPayload { movie_id };
        let response = self.send(self.request(Method::POST, "/users/watchlist").json(&payload)).await?;
        expect_success(SERVICE, response).await
    }

    async fn remove_from_watchlist(&self, movie_id: &MovieId) -> Result<(), SourceError> {
        let response = self
            .send(self.request(Method::DELETE, &api::watchlist_item_path(movie_id)))
            .await?;
        expect_success(SERVICE, response).await
    }

    async fn get_reviews(&self, movie_id: &MovieId) -> Result<Vec<ReviewRecord>, SourceError> {
        let response = self
            .send(self.request(Method::GET, &api::movie_reviews_path(movie_id)))
            .await?;
        read_json(SERVICE, response).await
    }

    async fn create_review(&self, movie_id: &MovieId, draft: &ReviewDraft) -> Result<(), SourceError> {
        let payload = NewReviewPayload::new(movie_id, draft);
        let response = self.send(self.request(Method::POST, "/reviews").json(&payload)).await?;
        expect_success(SERVICE, response).await
    }

    async fn update_review(&self, review_id: &str, draft: &ReviewDraft) -> Result<(), SourceError> {
        let response = self
            .send(self.request(Method::PUT, &api::review_path(review_id)).json(draft))
            .await?;
        expect_success(SERVICE, response).await
    }

    async fn delete_review(&self, review_id: &str) -> Result<(), SourceError> {
        let response = self
            .send(self.request(Method::DELETE, &api::review_path(review_id)))
            .await?;
        expect_success(SERVICE, response).await
    }
}
