use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use crate::error::SourceError;

const USER_AGENT: &str = concat!("showmar/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client. Requests have no overall timeout; a hung call only
/// stalls the view that issued it.
pub fn create_http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Read a JSON body, turning non-success statuses into `SourceError::Status`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, SourceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SourceError::Transport { service, error: e })?;

    if !status.is_success() {
        return Err(SourceError::from_status(service, status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| SourceError::Decode { service, error: e })
}

/// Check the status and discard the body.
pub(crate) async fn expect_success(service: &'static str, response: Response) -> Result<(), SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::from_status(service, status.as_u16(), &body))
}
