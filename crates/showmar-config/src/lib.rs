pub mod config;
pub mod paths;
pub mod store;

pub use config::{BackendConfig, CatalogConfig, Config, DisplayConfig};
pub use paths::{PathManager, container_base_path};
pub use store::{FileStore, LocalStore, MemoryStore, FAVORITES_KEY, THEME_KEY, TOKEN_KEY};
