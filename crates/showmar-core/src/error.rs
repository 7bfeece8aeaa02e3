use showmar_models::MovieId;
use showmar_sources::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No credential is available; the caller should send the user to log in.
    #[error("login required")]
    AuthRequired,

    #[error(transparent)]
    Remote(#[from] SourceError),

    #[error("could not load {} of {total} movies", .failed.len())]
    Hydration { failed: Vec<MovieId>, total: usize },

    #[error("{0}")]
    Invalid(String),

    #[error("cancelled")]
    Cancelled,

    #[error("local storage error: {0}")]
    Store(String),
}

impl ClientError {
    /// True when the right reaction is the login flow rather than an error message.
    pub fn requires_login(&self) -> bool {
        match self {
            ClientError::AuthRequired => true,
            ClientError::Remote(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Message for a notification: the backend's own wording when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Remote(e) => e.remote_message().unwrap_or(fallback).to_string(),
            ClientError::Invalid(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_remote_requires_login() {
        let err = ClientError::Remote(SourceError::Status {
            service: "backend",
            status: 401,
            message: Some("Token expired".to_string()),
        });
        assert!(err.requires_login());
        assert_eq!(err.user_message("Failed"), "Token expired");

        assert!(ClientError::AuthRequired.requires_login());
        assert!(!ClientError::Invalid("bad".to_string()).requires_login());
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::Remote(SourceError::Status {
            service: "backend",
            status: 500,
            message: None,
        });
        assert_eq!(err.user_message("Failed to remove"), "Failed to remove");
        assert_eq!(ClientError::Store("disk full".to_string()).user_message("Oops"), "Oops");
    }
}
