//! The authoritative half of an optimistic mutation.
//!
//! A [`RemoteSyncClient`] tells the service about a value the user already
//! sees locally and reports back one of three outcomes. Nothing here retries.

mod favorites;
mod outcome;
mod ratings;

use std::future::Future;

pub use favorites::FavoriteSync;
pub use outcome::{SyncFailure, SyncOutcome};
pub use ratings::RatingSync;

/// Confirms a locally applied value with the remote service.
pub trait RemoteSyncClient<V>: Send + Sync {
    /// Record `value` for `entity_id` remotely.
    ///
    /// `Ack` means the service durably recorded it. `Rejected` is a definitive
    /// refusal. `Unreachable` means no definitive answer was obtained.
    fn confirm(&self, entity_id: &str, value: &V) -> impl Future<Output = SyncOutcome> + Send;
}
