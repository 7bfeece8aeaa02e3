use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use showmar_models::{CatalogDetails, CatalogRecord, Genre, MovieCategory, MovieId};
use tracing::debug;
use crate::error::SourceError;
use crate::http::read_json;

const SERVICE: &str = "catalog";

/// Connection details shared by every catalog call.
#[derive(Clone)]
pub struct CatalogEndpoint {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
struct MovieListResponse {
    #[serde(default)]
    results: Vec<CatalogRecord>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Every catalog call carries the API key as a query parameter.
pub(crate) fn catalog_request(client: &Client, endpoint: &CatalogEndpoint, path: &str) -> RequestBuilder {
    let url = format!("{}/{}", endpoint.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
    debug!("GET {} (catalog)", url);
    client
        .get(url)
        .query(&[("api_key", endpoint.api_key.as_str()), ("language", endpoint.language.as_str())])
        .header("Accept", "application/json")
}

pub(crate) fn movie_path(id: &MovieId) -> String {
    format!("movie/{}", urlencoding::encode(id.as_str()))
}

/// Fetch one page of a category listing
pub async fn list_movies(
    client: &Client,
    endpoint: &CatalogEndpoint,
    category: MovieCategory,
    page: u32,
) -> Result<Vec<CatalogRecord>, SourceError> {
    let response = catalog_request(client, endpoint, &format!("movie/{}", category.path_segment()))
        .query(&[("page", page.max(1))])
        .send()
        .await
        .map_err(|e| SourceError::Transport { service: SERVICE, error: e })?;

    let list: MovieListResponse = read_json(SERVICE, response).await?;
    debug!("Catalog {} page {} returned {} movies", category, page, list.results.len());
    Ok(list.results)
}

/// Fetch the expanded record for one movie
pub async fn get_movie(client: &Client, endpoint: &CatalogEndpoint, id: &MovieId) -> Result<CatalogDetails, SourceError> {
    let response = catalog_request(client, endpoint, &movie_path(id))
        .send()
        .await
        .map_err(|e| SourceError::Transport { service: SERVICE, error: e })?;

    read_json(SERVICE, response).await
}

pub async fn list_genres(client: &Client, endpoint: &CatalogEndpoint) -> Result<Vec<Genre>, SourceError> {
    let response = catalog_request(client, endpoint, "genre/movie/list")
        .send()
        .await
        .map_err(|e| SourceError::Transport { service: SERVICE, error: e })?;

    let list: GenreListResponse = read_json(SERVICE, response).await?;
    Ok(list.genres)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> CatalogEndpoint {
        CatalogEndpoint {
            base_url: "https://api.themoviedb.org/3/".to_string(),
            api_key: "k3y".to_string(),
            language: "en-US".to_string(),
        }
    }

    #[test]
    fn test_request_carries_api_key() {
        let client = Client::new();
        let request = catalog_request(&client, &endpoint(), "/genre/movie/list").build().unwrap();

        assert_eq!(request.url().path(), "/3/genre/movie/list");
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert!(pairs.contains(&("api_key".to_string(), "k3y".to_string())));
        assert!(pairs.contains(&("language".to_string(), "en-US".to_string())));
    }

    #[test]
    fn test_movie_path_encodes_id() {
        assert_eq!(movie_path(&MovieId::from(550u64)), "movie/550");
        assert_eq!(movie_path(&MovieId::new("a b/c")), "movie/a%20b%2Fc");
    }

    #[test]
    fn test_list_payload_shape() {
        let body = r#"{"page": 1, "results": [{"id": 1, "title": "One"}, {"id": 2, "title": "Two"}], "total_pages": 5}"#;
        let list: MovieListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(list.results.len(), 2);
        assert_eq!(list.results[1].title, "Two");
    }
}
