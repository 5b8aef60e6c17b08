use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::key_value::UpdateFn;
use super::{KeyValueStore, StorageUnavailable};

/// Volatile store backed by a `HashMap`, shared between clones.
///
/// Nothing survives the process; useful for tests and for sessions that
/// should not persist.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageUnavailable> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageUnavailable> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in items {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageUnavailable> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    fn update_item(&self, key: &str, update: &mut UpdateFn<'_>) -> Result<(), StorageUnavailable> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let next = update(entries.get(key).map(String::as_str))?;
        entries.insert(key.to_string(), next);
        Ok(())
    }
}
