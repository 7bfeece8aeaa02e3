use crate::error::ClientError;
use showmar_config::{LocalStore, THEME_KEY};
use showmar_models::Theme;
use std::sync::Arc;
use tracing::warn;

/// Persisted light/dark choice with a system-preference fallback.
pub struct ThemePreference {
    store: Arc<dyn LocalStore>,
    prefers_dark: bool,
}

impl ThemePreference {
    pub fn new(store: Arc<dyn LocalStore>, prefers_dark: bool) -> Self {
        Self { store, prefers_dark }
    }

    pub fn current(&self) -> Theme {
        if let Some(raw) = self.store.get(THEME_KEY) {
            match raw.parse::<Theme>() {
                Ok(theme) => return theme,
                Err(e) => warn!("Ignoring stored theme: {}", e),
            }
        }
        if self.prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn set(&self, theme: Theme) -> Result<(), ClientError> {
        self.store
            .set(THEME_KEY, theme.as_str().to_string())
            .map_err(|e| ClientError::Store(e.to_string()))
    }

    pub fn toggle(&self) -> Result<Theme, ClientError> {
        let next = self.current().toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        self.store
            .remove(THEME_KEY)
            .map_err(|e| ClientError::Store(e.to_string()))
    }
}
