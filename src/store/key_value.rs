use std::sync::Arc;

use super::StorageUnavailable;

/// Callback used by [`KeyValueStore::update_item`]: receives the current raw
/// value (if any) and returns the value to write back.
pub type UpdateFn<'a> = dyn FnMut(Option<&str>) -> Result<String, StorageUnavailable> + 'a;

/// String key-value storage that survives process restarts.
///
/// Implementations must make each call atomic with respect to the others:
/// a batch of writes or removals is either fully visible or not at all, and
/// `update_item` is a read-modify-write no other writer can interleave with.
pub trait KeyValueStore: Send + Sync {
    /// Read a raw value. An absent key is `Ok(None)`, not an error.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageUnavailable>;

    /// Write several entries in one step.
    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageUnavailable>;

    /// Remove several keys in one step. Missing keys are ignored.
    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageUnavailable>;

    /// Atomically replace the value under `key` with the result of `update`.
    ///
    /// If `update` fails, nothing is written and its error is returned.
    fn update_item(&self, key: &str, update: &mut UpdateFn<'_>) -> Result<(), StorageUnavailable>;

    /// Write a single entry.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageUnavailable> {
        self.set_items(&[(key, value)])
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageUnavailable> {
        (**self).get_item(key)
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageUnavailable> {
        (**self).set_items(items)
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageUnavailable> {
        (**self).remove_items(keys)
    }

    fn update_item(&self, key: &str, update: &mut UpdateFn<'_>) -> Result<(), StorageUnavailable> {
        (**self).update_item(key, update)
    }
}
