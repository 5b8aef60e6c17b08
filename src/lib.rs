//! Client core for a movie-browsing application.
//!
//! Favorites and ratings are applied optimistically: the new value is shown
//! and cached immediately, confirmed against the movie service, and rolled
//! back (with a notification) when the service refuses it or cannot be
//! reached. See [`OptimisticToggleController`].

pub mod api;
pub mod auth;
pub mod cache;
pub mod catalog;
mod client;
pub mod comments;
pub mod config;
pub mod controller;
mod error;
pub mod favorites;
pub mod lock;
pub mod merge;
pub mod notify;
pub mod ratings;
pub mod session;
pub mod store;
pub mod sync;
pub mod validation;

pub use api::{ApiClient, ApiError, Movie};
pub use auth::{AuthError, AuthService};
pub use cache::LocalCacheStore;
pub use client::MovieClient;
pub use comments::{CommentError, CommentThread};
pub use config::{ClientConfig, ConfigError};
pub use controller::{OptimisticToggleController, Provenance, Settled, ToggleError, ToggleState};
pub use error::ClientError;
pub use favorites::FavoritesBoard;
pub use lock::GuardPolicy;
pub use merge::{merge_favorites, merge_with_overrides, Merged};
pub use notify::{Notification, Notifier};
pub use ratings::{Rating, RatingBoard, RatingSummary};
pub use session::{Session, SessionStore};
#[cfg(feature = "file-store")]
pub use store::FileStore;
pub use store::{InMemoryStore, KeyValueStore, StorageUnavailable};
pub use sync::{RemoteSyncClient, SyncOutcome};
pub use validation::ValidationError;
