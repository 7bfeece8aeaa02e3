use reqwest::multipart::{Form, Part};
use serde::Serialize;
use showmar_models::{MovieId, ProfileUpdate, ReviewDraft};
use std::path::Path;
use crate::error::SourceError;

pub(crate) const SERVICE: &str = "backend";

#[derive(Debug, Serialize)]
pub(crate) struct WatchlistAddPayload<'a> {
    #[serde(rename = "movieId")]
    pub movie_id: &'a MovieId,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewReviewPayload<'a> {
    #[serde(rename = "movieId")]
    pub movie_id: &'a MovieId,
    pub rating: u8,
    pub comment: &'a str,
}

impl<'a> NewReviewPayload<'a> {
    pub fn new(movie_id: &'a MovieId, draft: &'a ReviewDraft) -> Self {
        Self {
            movie_id,
            rating: draft.rating,
            comment: &draft.comment,
        }
    }
}

pub(crate) fn watchlist_item_path(movie_id: &MovieId) -> String {
    format!("/users/watchlist/{}", urlencoding::encode(movie_id.as_str()))
}

pub(crate) fn movie_reviews_path(movie_id: &MovieId) -> String {
    format!("/reviews/{}", urlencoding::encode(movie_id.as_str()))
}

pub(crate) fn review_path(review_id: &str) -> String {
    format!("/reviews/{}", urlencoding::encode(review_id))
}

/// Multipart body for `PUT /users/profile`. The password field is always
/// present; empty means unchanged.
pub(crate) async fn profile_form(update: &ProfileUpdate) -> Result<Form, SourceError> {
    let mut form = Form::new()
        .text("name", update.name.clone())
        .text("email", update.email.clone())
        .text("password", update.password.clone().unwrap_or_default());

    if let Some(path) = &update.avatar {
        let bytes = tokio::fs::read(path).await.map_err(|e| SourceError::Io {
            path: path.clone(),
            error: e,
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("avatar")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime_type(path))
            .map_err(|e| SourceError::Transport { service: SERVICE, error: e })?;
        form = form.part("avatar", part);
    }

    Ok(form)
}

fn image_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
