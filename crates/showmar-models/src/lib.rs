pub mod catalog;
pub mod filter_spec;
pub mod movie_id;
pub mod review;
pub mod theme;
pub mod user;
pub mod watchlist;

pub use catalog::{CatalogDetails, CatalogRecord, Genre, MovieCategory};
pub use filter_spec::{FilterSpec, SortKey};
pub use movie_id::MovieId;
pub use review::{ReviewAuthor, ReviewDraft, ReviewRecord};
pub use theme::Theme;
pub use user::{AuthToken, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
pub use watchlist::WatchlistEntry;
