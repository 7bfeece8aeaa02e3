use async_trait::async_trait;
use showmar_models::{
    AuthToken, CatalogDetails, CatalogRecord, Genre, LoginRequest, MovieCategory, MovieId,
    ProfileUpdate, RegisterRequest, ReviewDraft, ReviewRecord, UserProfile,
};
use crate::error::SourceError;

/// Read-only movie catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_movies(&self, category: MovieCategory, page: u32) -> Result<Vec<CatalogRecord>, SourceError>;
    async fn get_movie(&self, id: &MovieId) -> Result<CatalogDetails, SourceError>;
    async fn list_genres(&self) -> Result<Vec<Genre>, SourceError>;
}

/// Application backend: accounts, watchlist and reviews.
///
/// The bearer credential is transport state. Once `set_auth_token` returns,
/// every later request carries the new value (or none).
/// Ownership of reviews is enforced here, not by the client.
#[async_trait]
pub trait BackendService: Send + Sync {
    fn set_auth_token(&self, token: Option<&str>);
    fn has_auth_token(&self) -> bool;

    // Authentication
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, SourceError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthToken, SourceError>;

    // Profile
    async fn get_profile(&self) -> Result<UserProfile, SourceError>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), SourceError>;

    // Watchlist
    async fn get_watchlist(&self) -> Result<Vec<MovieId>, SourceError>;
    async fn add_to_watchlist(&self, movie_id: &MovieId) -> Result<(), SourceError>;
    async fn remove_from_watchlist(&self, movie_id: &MovieId) -> Result<(), SourceError>;

    // Reviews
    async fn get_reviews(&self, movie_id: &MovieId) -> Result<Vec<ReviewRecord>, SourceError>;
    async fn create_review(&self, movie_id: &MovieId, draft: &ReviewDraft) -> Result<(), SourceError>;
    async fn update_review(&self, review_id: &str, draft: &ReviewDraft) -> Result<(), SourceError>;
    async fn delete_review(&self, review_id: &str) -> Result<(), SourceError>;
}
