//! Login, registration and the signed-in user's profile.

use crate::credential::{Credential, CredentialPropagator};
use crate::error::ClientError;
use crate::notify::Notifier;
use showmar_models::{LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
use showmar_sources::BackendService;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Session {
    backend: Arc<dyn BackendService>,
    credentials: Arc<CredentialPropagator>,
    notifier: Arc<dyn Notifier>,
}

impl Session {
    pub fn new(
        backend: Arc<dyn BackendService>,
        credentials: Arc<CredentialPropagator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { backend, credentials, notifier }
    }

    pub fn credentials(&self) -> &CredentialPropagator {
        &self.credentials
    }

    /// Exchange email/password for a token. The token is stored and applied
    /// to the transport before this returns.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ClientError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let token = match self.backend.login(&request).await {
            Ok(token) => token,
            Err(e) => return Err(self.report(e.into(), "Login failed")),
        };

        self.credentials.set_credential(Some(&token.token))?;
        info!(email = %request.email, "Logged in");
        self.notifier.success("Login successful!");
        self.credentials.current().ok_or(ClientError::AuthRequired)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Credential, ClientError> {
        let request = RegisterRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let token = match self.backend.register(&request).await {
            Ok(token) => token,
            Err(e) => return Err(self.report(e.into(), "Registration failed")),
        };

        self.credentials.set_credential(Some(&token.token))?;
        info!(username = %request.username, "Registered");
        self.notifier.success("Registration successful!");
        self.credentials.current().ok_or(ClientError::AuthRequired)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.credentials.set_credential(None)?;
        info!("Logged out");
        self.notifier.success("Logged out");
        Ok(())
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.credentials.require()?;
        self.backend.get_profile().await.map_err(|e| {
            let err = ClientError::from(e);
            if !err.requires_login() {
                warn!("Failed to load profile: {}", err);
                self.notifier.error("Failed to load user profile");
            }
            err
        })
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ClientError> {
        self.credentials.require()?;
        if update.email.trim().is_empty() {
            return Err(ClientError::Invalid("Email cannot be empty".to_string()));
        }

        match self.backend.update_profile(update).await {
            Ok(()) => {
                self.notifier.success("Profile updated");
                Ok(())
            }
            Err(e) => Err(self.report(e.into(), "Update failed")),
        }
    }

    fn report(&self, err: ClientError, fallback: &str) -> ClientError {
        warn!("{}: {}", fallback, err);
        self.notifier.error(&err.user_message(fallback));
        err
    }
}
