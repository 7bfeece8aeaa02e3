pub mod account;
pub mod browse;
pub mod clear;
pub mod favorites;
pub mod movie;
pub mod progress;
pub mod prompts;
pub mod reviews;
pub mod tables;
pub mod theme;
pub mod watchlist;

use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use showmar_config::{Config, FileStore, LocalStore, PathManager};
use showmar_core::{ClientError, CredentialPropagator, FavoritesManager, Notifier, Session, ThemePreference};
use showmar_sources::{BackendService, CatalogService, ServiceFactory};
use std::future::Future;
use std::sync::Arc;

/// Everything a command needs, wired once at startup.
pub struct App {
    pub config: Config,
    pub paths: PathManager,
    pub store: Arc<dyn LocalStore>,
    pub output: Arc<Output>,
    pub backend: Arc<dyn BackendService>,
    pub credentials: Arc<CredentialPropagator>,
}

impl App {
    pub fn load(output: Arc<Output>) -> Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create {}: {}", paths.config_dir().display(), e))?;

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        if !config_file.exists() {
            // Leave a file to edit; env overrides are not written back
            Config::default()
                .save_to_file(&config_file)
                .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
            tracing::info!("Wrote default configuration to {}", config_file.display());
        }

        let store_file = paths.store_file();
        let store: Arc<dyn LocalStore> = Arc::new(
            FileStore::open(store_file.clone())
                .map_err(|e| eyre!("Failed to open local store at {}: {}", store_file.display(), e))?,
        );

        let backend = ServiceFactory::create_backend(&config);
        let credentials = Arc::new(CredentialPropagator::new(store.clone(), backend.clone()));
        // The token must reach the transport before the first backend request
        credentials.restore();

        Ok(Self {
            config,
            paths,
            store,
            output,
            backend,
            credentials,
        })
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.output.clone()
    }

    pub fn catalog(&self) -> Result<Arc<dyn CatalogService>> {
        ServiceFactory::create_all(&self.config)
            .map(|services| services.catalog)
            .map_err(|e| eyre!("{}", e))
    }

    pub fn favorites(&self) -> FavoritesManager {
        FavoritesManager::new(self.store.clone())
    }

    pub fn session(&self) -> Session {
        Session::new(self.backend.clone(), self.credentials.clone(), self.notifier())
    }

    pub fn theme(&self) -> ThemePreference {
        ThemePreference::new(self.store.clone(), self.config.display.prefers_dark)
    }

    /// Make sure a credential exists before an action that needs one.
    ///
    /// On a terminal this runs the login flow; otherwise it points the user
    /// at `showmar login` and returns `false`.
    pub async fn ensure_login(&self) -> Result<bool> {
        if self.credentials.is_logged_in() {
            return Ok(true);
        }

        if progress::is_interactive() {
            self.output.warn("You need to log in first");
            return account::login_flow(self, None).await;
        }

        self.output.error("Login required. Run `showmar login` first.");
        Ok(false)
    }

    /// Final handling of a core error.
    pub fn report(&self, err: ClientError) -> Result<()> {
        match err {
            ClientError::Cancelled => {
                self.output.warn("Cancelled");
                Ok(())
            }
            ClientError::AuthRequired => {
                self.output.error("Login required. Run `showmar login` first.");
                Ok(())
            }
            err if err.requires_login() => {
                // Backend rejected the stored token
                self.credentials
                    .set_credential(None)
                    .map_err(|e| eyre!("Failed to clear expired login: {}", e))?;
                self.output.error("Your session has expired. Run `showmar login` to sign in again.");
                Ok(())
            }
            err => Err(err.into()),
        }
    }
}

/// Run `fut` until it finishes or Ctrl-C is pressed. On Ctrl-C the future is
/// dropped, so nothing it would have reported is shown.
pub async fn until_interrupted<T, F>(fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    tokio::select! {
        result = fut => result,
        _ = tokio::signal::ctrl_c() => Err(ClientError::Cancelled),
    }
}

/// Same as `until_interrupted` for catalog calls, which fail with `SourceError`.
pub async fn fetch<T, F>(fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, showmar_sources::SourceError>>,
{
    until_interrupted(async { fut.await.map_err(ClientError::from) }).await
}

pub fn parse_movie_id(raw: &str) -> Result<showmar_models::MovieId> {
    raw.parse().map_err(|e: String| eyre!(e))
}
