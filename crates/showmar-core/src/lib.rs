pub mod catalog;
pub mod credential;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod notify;
pub mod recommend;
pub mod reviews;
pub mod session;
pub mod theme;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use credential::{decode_subject_id, Credential, CredentialPropagator};
pub use error::ClientError;
pub use favorites::{FavoriteSet, FavoritesManager};
pub use filter::apply as apply_filters;
pub use notify::{Confirmation, Notifier};
pub use recommend::recommend;
pub use reviews::{EditSession, ReviewCollection};
pub use session::Session;
pub use theme::ThemePreference;
pub use watchlist::{WatchlistPhase, WatchlistReconciler};
