//! Persistent key-value collaborator.
//!
//! Everything the client keeps between runs (session fields, cached favorite
//! flags, cached ratings) goes through a `KeyValueStore`: string keys, string
//! values, with batched writes and removals that land all-or-nothing.

mod error;
#[cfg(feature = "file-store")]
mod file;
mod in_memory;
mod key_value;

pub use error::StorageUnavailable;
#[cfg(feature = "file-store")]
pub use file::FileStore;
pub use in_memory::InMemoryStore;
pub use key_value::{KeyValueStore, UpdateFn};
