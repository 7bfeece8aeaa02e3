use crate::error::ClientError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use showmar_config::{LocalStore, TOKEN_KEY};
use showmar_sources::BackendService;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A bearer token plus the subject id decoded from its payload.
///
/// The subject is read without verifying the signature. It only drives
/// ownership hints in the UI; the backend enforces the real check.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    subject_id: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let subject_id = decode_subject_id(&token);
        Self { token, subject_id }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn subject_id(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"***")
            .field("subject_id", &self.subject_id)
            .finish()
    }
}

/// Keeps the stored token and the backend transport header in step.
pub struct CredentialPropagator {
    store: Arc<dyn LocalStore>,
    backend: Arc<dyn BackendService>,
}

impl CredentialPropagator {
    pub fn new(store: Arc<dyn LocalStore>, backend: Arc<dyn BackendService>) -> Self {
        Self { store, backend }
    }

    /// Push whatever token the store holds to the transport. Call once at
    /// startup before any backend request.
    pub fn restore(&self) -> Option<Credential> {
        let credential = self.current();
        self.backend.set_auth_token(credential.as_ref().map(Credential::token));
        debug!(logged_in = credential.is_some(), "Restored credential");
        credential
    }

    /// Persist then propagate. `None` logs out. Idempotent.
    pub fn set_credential(&self, token: Option<&str>) -> Result<(), ClientError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        match token {
            Some(token) => self
                .store
                .set(TOKEN_KEY, token.to_string())
                .map_err(|e| ClientError::Store(e.to_string()))?,
            None => self
                .store
                .remove(TOKEN_KEY)
                .map_err(|e| ClientError::Store(e.to_string()))?,
        }
        self.backend.set_auth_token(token);
        Ok(())
    }

    pub fn current(&self) -> Option<Credential> {
        self.store
            .get(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
            .map(Credential::new)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    /// Credential for an action that needs one.
    ///
    /// Returns `AuthRequired` when absent so the caller can route to login.
    /// The token is re-applied to the transport in case another process
    /// wrote it since `restore`.
    pub fn require(&self) -> Result<Credential, ClientError> {
        match self.current() {
            Some(credential) => {
                self.backend.set_auth_token(Some(credential.token()));
                Ok(credential)
            }
            None => {
                self.backend.set_auth_token(None);
                Err(ClientError::AuthRequired)
            }
        }
    }

    /// `None` means ownership cannot be determined.
    pub fn current_subject_id(&self) -> Option<String> {
        self.current().and_then(|c| c.subject_id)
    }
}

/// Best-effort read of the subject id from a JWT-shaped token.
pub fn decode_subject_id(token: &str) -> Option<String> {
    match try_decode_subject_id(token) {
        Ok(subject) => subject,
        Err(reason) => {
            warn!("Could not decode credential payload: {}", reason);
            None
        }
    }
}

fn try_decode_subject_id(token: &str) -> Result<Option<String>, String> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| "token has no payload segment".to_string())?;

    // Accept standard base64 as well as base64url, padded or not
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| format!("invalid base64: {}", e))?;
    let claims: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| format!("invalid JSON: {}", e))?;

    for key in ["id", "_id", "sub", "userId"] {
        match claims.get(key) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return Ok(Some(s.clone())),
            Some(serde_json::Value::Number(n)) => return Ok(Some(n.to_string())),
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_token, FakeBackend};
    use showmar_config::MemoryStore;

    fn propagator() -> (Arc<MemoryStore>, Arc<FakeBackend>, CredentialPropagator) {
        let store = Arc::new(MemoryStore::new());
        let backend = Arc::new(FakeBackend::new());
        let credentials = CredentialPropagator::new(store.clone(), backend.clone());
        (store, backend, credentials)
    }

    #[test]
    fn test_decode_subject_from_id_claim() {
        let token = make_token(r#"{"id":"64f1c0ffee","iat":1700000000}"#);
        assert_eq!(decode_subject_id(&token), Some("64f1c0ffee".to_string()));
    }

    #[test]
    fn test_decode_subject_falls_back_to_sub() {
        let token = make_token(r#"{"sub":42}"#);
        assert_eq!(decode_subject_id(&token), Some("42".to_string()));
    }

    #[test]
    fn test_decode_garbage_is_absent() {
        assert_eq!(decode_subject_id("not-a-jwt"), None);
        assert_eq!(decode_subject_id("a.%%%%.c"), None);
        assert_eq!(decode_subject_id(&make_token("[1,2,3]")), None);
        assert_eq!(decode_subject_id(&make_token(r#"{"role":"admin"}"#)), None);
    }

    #[test]
    fn test_decode_accepts_padded_standard_alphabet() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;
        // Chosen so the standard encoding contains '+' or '/'
        let payload = STANDARD.encode(r#"{"id":"u>>?"}"#);
        let token = format!("h.{}.s", payload);
        assert_eq!(decode_subject_id(&token), Some("u>>?".to_string()));
    }

    #[test]
    fn test_set_credential_persists_and_propagates() {
        let (store, backend, credentials) = propagator();
        let token = make_token(r#"{"id":"u1"}"#);

        credentials.set_credential(Some(&token)).unwrap();
        assert_eq!(store.get(TOKEN_KEY), Some(token.clone()));
        assert_eq!(backend.current_token(), Some(token));
        assert_eq!(credentials.current_subject_id(), Some("u1".to_string()));

        credentials.set_credential(None).unwrap();
        credentials.set_credential(None).unwrap();
        assert!(store.get(TOKEN_KEY).is_none());
        assert_eq!(backend.current_token(), None);
        assert!(!credentials.is_logged_in());
    }

    #[test]
    fn test_restore_applies_stored_token() {
        let (store, backend, credentials) = propagator();
        store.set(TOKEN_KEY, "stored-token".to_string()).unwrap();

        let credential = credentials.restore().unwrap();
        assert_eq!(credential.token(), "stored-token");
        assert_eq!(credential.subject_id(), None);
        assert_eq!(backend.current_token(), Some("stored-token".to_string()));
    }

    #[test]
    fn test_require_without_token_is_auth_required() {
        let (_store, backend, credentials) = propagator();
        let err = credentials.require().unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired));
        assert!(backend.current_token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("secret.value.here");
        assert!(!format!("{:?}", credential).contains("secret"));
    }
}
