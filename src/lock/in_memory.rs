use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::{GuardPolicy, LockError};

/// Proof that the holder is the only mutation in flight for `key`.
///
/// Dropping the permit releases the key and wakes the next queued waiter.
pub struct EntityPermit {
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl EntityPermit {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for EntityPermit {
    fn drop(&mut self) {
        log::trace!("released guard for {}", self.key);
    }
}

/// Lock manager backed by a `HashMap<String, Arc<Mutex<()>>>`.
///
/// Lazily creates one async lock per unique key and returns the same `Arc`
/// for repeated lookups. Waiters on a key are woken in FIFO order.
pub struct EntityLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        EntityLocks {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the guard for `key` according to `policy`.
    pub async fn acquire(
        &self,
        key: &str,
        policy: GuardPolicy,
    ) -> Result<EntityPermit, LockError> {
        let lock = self.get_lock(key);
        let guard = match policy {
            GuardPolicy::Queue => lock.lock_owned().await,
            GuardPolicy::Reject => lock
                .try_lock_owned()
                .map_err(|_| LockError::Busy(key.to_string()))?,
        };
        log::trace!("acquired guard for {}", key);
        Ok(EntityPermit {
            key: key.to_string(),
            _guard: guard,
        })
    }

    /// Whether a permit for `key` is currently held.
    pub fn is_held(&self, key: &str) -> bool {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        match locks.get(key) {
            Some(lock) => lock.try_lock().is_err(),
            None => false,
        }
    }

    // Entries are never pruned: one per entity ever mutated, which is bounded
    // by the catalog size. The map only ever gains entries, so a poisoned map
    // is still coherent.
    fn get_lock(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

impl Default for EntityLocks {
    fn default() -> Self {
        Self::new()
    }
}
