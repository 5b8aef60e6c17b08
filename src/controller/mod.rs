//! Optimistic mutation with local cache reconciliation.
//!
//! Per entity the controller moves `Idle -> Pending -> Idle`:
//!
//! 1. Under the entity's guard, read the current value `v0` (in-memory
//!    mirror, seeded from the cache on first access).
//! 2. Compute `v1`, write it to the mirror and the cache. This write completes
//!    before the remote call is issued.
//! 3. Ask the [`RemoteSyncClient`](crate::sync::RemoteSyncClient) to confirm
//!    `v1`. On `Ack` nothing else happens. On `Rejected` or `Unreachable`
//!    the mirror and the cache go back to `v0` and a notification is
//!    published.
//! 4. Drop the guard, whatever happened.
//!
//! A second mutation for an entity that is still pending either waits for the
//! first to settle or is refused with [`ToggleError::Busy`], depending on the
//! [`GuardPolicy`](crate::lock::GuardPolicy).

mod controller;
mod error;
mod state;

pub use controller::OptimisticToggleController;
pub use error::ToggleError;
pub use state::{PendingMutation, Provenance, SettleOutcome, Settled, Toggle, ToggleState};
