use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {service} failed: {error}")]
    Transport {
        service: &'static str,
        #[source]
        error: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        service: &'static str,
        status: u16,
        message: Option<String>,
    },

    #[error("could not decode {service} response: {error}")]
    Decode {
        service: &'static str,
        #[source]
        error: serde_json::Error,
    },

    #[error("failed to read {}: {error}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn from_status(service: &'static str, status: u16, body: &str) -> Self {
        SourceError::Status {
            service,
            status,
            message: extract_message(body),
        }
    }

    /// Human-readable reason supplied by the remote side, if any.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            SourceError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Backend errors carry `message`; the catalog uses `status_message`.
fn extract_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "status_message", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
