pub mod backend;
pub mod error;
pub mod factory;
pub mod http;
pub mod tmdb;
pub mod traits;

pub use backend::BackendClient;
pub use error::SourceError;
pub use factory::{ServiceFactory, Services};
pub use tmdb::TmdbClient;
pub use traits::{BackendService, CatalogService};
