//! In-memory collaborators for the core's unit tests.

use crate::notify::Notifier;
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use showmar_models::{
    AuthToken, CatalogDetails, CatalogRecord, Genre, LoginRequest, MovieCategory, MovieId,
    ProfileUpdate, RegisterRequest, ReviewAuthor, ReviewDraft, ReviewRecord, UserProfile,
};
use showmar_sources::{BackendService, CatalogService, SourceError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const FAKE_USER_ID: &str = "user-1";

pub fn record(id: u64, title: &str, genres: &[u32]) -> CatalogRecord {
    CatalogRecord {
        id: MovieId::from(id),
        title: title.to_string(),
        release_date: Some("2020-01-01".to_string()),
        vote_average: Some(7.0),
        genre_ids: genres.to_vec(),
        poster_path: Some(format!("/{}.jpg", id)),
        popularity: id as f64,
        overview: None,
    }
}

pub fn details(id: u64, title: &str) -> CatalogDetails {
    CatalogDetails {
        id: MovieId::from(id),
        title: title.to_string(),
        tagline: None,
        overview: None,
        release_date: Some("2020-01-01".to_string()),
        runtime: Some(120),
        genres: vec![Genre { id: 18, name: "Drama".to_string() }],
        vote_average: Some(7.0),
        poster_path: None,
        popularity: 1.0,
    }
}

/// Unsigned JWT-shaped token carrying `claims` as its payload.
pub fn make_token(claims: &str) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims)
    )
}

pub fn user_token() -> String {
    make_token(&format!(r#"{{"id":"{}"}}"#, FAKE_USER_ID))
}

fn status(code: u16, message: &str) -> SourceError {
    SourceError::Status {
        service: "fake",
        status: code,
        message: Some(message.to_string()),
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    movies: Mutex<HashMap<MovieId, CatalogDetails>>,
    failing: Mutex<HashSet<MovieId>>,
    hanging: Mutex<HashSet<MovieId>>,
    pub requests: Mutex<Vec<MovieId>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(ids: &[u64]) -> Self {
        let catalog = Self::new();
        for id in ids {
            catalog.insert(details(*id, &format!("Movie {}", id)));
        }
        catalog
    }

    pub fn insert(&self, movie: CatalogDetails) {
        self.movies.lock().unwrap().insert(movie.id.clone(), movie);
    }

    pub fn fail(&self, id: u64) {
        self.failing.lock().unwrap().insert(MovieId::from(id));
    }

    /// Requests for `id` never complete.
    pub fn hang(&self, id: u64) {
        self.hanging.lock().unwrap().insert(MovieId::from(id));
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn list_movies(&self, _category: MovieCategory, _page: u32) -> Result<Vec<CatalogRecord>, SourceError> {
        let movies = self.movies.lock().unwrap();
        let mut records: Vec<CatalogRecord> = movies.values().cloned().map(CatalogRecord::from).collect();
        records.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(records)
    }

    async fn get_movie(&self, id: &MovieId) -> Result<CatalogDetails, SourceError> {
        self.requests.lock().unwrap().push(id.clone());
        let hangs = self.hanging.lock().unwrap().contains(id);
        if hangs {
            futures::future::pending::<()>().await;
        }
        if self.failing.lock().unwrap().contains(id) {
            return Err(status(500, "catalog unavailable"));
        }
        self.movies
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| status(404, "The resource you requested could not be found."))
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, SourceError> {
        Ok(vec![
            Genre { id: 18, name: "Drama".to_string() },
            Genre { id: 28, name: "Action".to_string() },
        ])
    }
}

/// Backend double. Operations named in `fail_on` answer HTTP 500;
/// authenticated operations answer 401 without a token.
#[derive(Default)]
pub struct FakeBackend {
    token: Mutex<Option<String>>,
    failing: Mutex<HashSet<&'static str>>,
    pub calls: Mutex<Vec<String>>,
    pub watchlist: Mutex<Vec<MovieId>>,
    pub reviews: Mutex<Vec<ReviewRecord>>,
    pub profile: Mutex<UserProfile>,
    next_review: Mutex<u32>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_watchlist(ids: &[u64]) -> Self {
        let backend = Self::new();
        *backend.watchlist.lock().unwrap() = ids.iter().map(|id| MovieId::from(*id)).collect();
        backend
    }

    pub fn fail_on(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub fn current_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn seed_review(&self, id: &str, movie_id: u64, author: &str, rating: u8, comment: &str) {
        self.reviews.lock().unwrap().push(ReviewRecord {
            id: id.to_string(),
            movie_id: MovieId::from(movie_id),
            author: Some(ReviewAuthor {
                id: author.to_string(),
                username: Some(author.to_string()),
            }),
            rating,
            comment: comment.to_string(),
            created_at: None,
        });
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == op).count()
    }

    fn enter(&self, op: &'static str, authenticated: bool) -> Result<(), SourceError> {
        self.calls.lock().unwrap().push(op.to_string());
        if authenticated && self.token.lock().unwrap().is_none() {
            return Err(status(401, "No token, authorization denied"));
        }
        if self.failing.lock().unwrap().contains(op) {
            return Err(status(500, &format!("{} exploded", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendService for FakeBackend {
    fn set_auth_token(&self, token: Option<&str>) {
        *self.token.lock().unwrap() = token.map(str::to_string);
    }

    fn has_auth_token(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, SourceError> {
        self.enter("login", false)?;
        if request.password != "hunter2" {
            return Err(status(400, "Invalid credentials"));
        }
        Ok(AuthToken { token: user_token() })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthToken, SourceError> {
        self.enter("register", false)?;
        if request.email.is_empty() {
            return Err(status(400, "Email is required"));
        }
        Ok(AuthToken { token: user_token() })
    }

    async fn get_profile(&self) -> Result<UserProfile, SourceError> {
        self.enter("get_profile", true)?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), SourceError> {
        self.enter("update_profile", true)?;
        let mut profile = self.profile.lock().unwrap();
        profile.name = Some(update.name.clone());
        profile.email = Some(update.email.clone());
        if update.avatar.is_some() {
            profile.avatar_url = Some("/uploads/avatar.png".to_string());
        }
        Ok(())
    }

    async fn get_watchlist(&self) -> Result<Vec<MovieId>, SourceError> {
        self.enter("get_watchlist", true)?;
        Ok(self.watchlist.lock().unwrap().clone())
    }

    async fn add_to_watchlist(&self, movie_id: &MovieId) -> Result<(), SourceError> {
        self.enter("add_to_watchlist", true)?;
        let mut watchlist = self.watchlist.lock().unwrap();
        if !watchlist.contains(movie_id) {
            watchlist.push(movie_id.clone());
        }
        Ok(())
    }

    async fn remove_from_watchlist(&self, movie_id: &MovieId) -> Result<(), SourceError> {
        self.enter("remove_from_watchlist", true)?;
        self.watchlist.lock().unwrap().retain(|id| id != movie_id);
        Ok(())
    }

    async fn get_reviews(&self, movie_id: &MovieId) -> Result<Vec<ReviewRecord>, SourceError> {
        self.enter("get_reviews", false)?;
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.movie_id == movie_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, movie_id: &MovieId, draft: &ReviewDraft) -> Result<(), SourceError> {
        self.enter("create_review", true)?;
        let mut next = self.next_review.lock().unwrap();
        *next += 1;
        self.reviews.lock().unwrap().push(ReviewRecord {
            id: format!("new-{}", next),
            movie_id: movie_id.clone(),
            author: Some(ReviewAuthor {
                id: FAKE_USER_ID.to_string(),
                username: Some("me".to_string()),
            }),
            rating: draft.rating,
            comment: draft.comment.clone(),
            created_at: None,
        });
        Ok(())
    }

    async fn update_review(&self, review_id: &str, draft: &ReviewDraft) -> Result<(), SourceError> {
        self.enter("update_review", true)?;
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| status(404, "Review not found"))?;
        review.rating = draft.rating;
        review.comment = draft.comment.clone();
        Ok(())
    }

    async fn delete_review(&self, review_id: &str) -> Result<(), SourceError> {
        self.enter("delete_review", true)?;
        self.reviews.lock().unwrap().retain(|r| r.id != review_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub celebrations: Mutex<usize>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_success(&self) -> Option<String> {
        self.successes.lock().unwrap().last().cloned()
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn celebrate(&self) {
        *self.celebrations.lock().unwrap() += 1;
    }
}
