//! Per-entity mutual exclusion for in-flight mutations.
//!
//! `EntityLocks` hands out one async lock per key, lazily created and shared
//! by every caller asking for the same key. The permit it returns is released
//! when dropped, so a settled, failed, panicked or aborted mutation can never
//! leave an entity wedged.

mod error;
mod in_memory;
mod policy;

pub use error::LockError;
pub use in_memory::{EntityLocks, EntityPermit};
pub use policy::GuardPolicy;
