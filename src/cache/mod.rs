//! Namespaced entity cache over a [`KeyValueStore`].
//!
//! Each namespace is persisted as one JSON object under its own key, mapping
//! entity ids to values:
//!
//! ```json
//! { "64f1c0...": true, "64f1c1...": false }
//! ```
//!
//! Reading a namespace that was never written is an empty mapping. A
//! namespace that no longer parses is `StorageUnavailable` for every read and
//! every write; writes never clobber it.

use std::collections::HashMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{KeyValueStore, StorageUnavailable};

/// Namespace holding cached favorite flags (`movie id -> bool`).
pub const FAVORITES_NAMESPACE: &str = "cachedFavorites";

/// Namespace holding the current user's cached ratings (`movie id -> 1..=5 | null`).
pub const RATINGS_NAMESPACE: &str = "cachedRatings";

/// Durable `entity id -> V` mapping stored in a single namespace.
pub struct LocalCacheStore<V, S> {
    store: S,
    namespace: String,
    _value: PhantomData<fn() -> V>,
}

impl<V, S: Clone> Clone for LocalCacheStore<V, S> {
    fn clone(&self) -> Self {
        LocalCacheStore {
            store: self.store.clone(),
            namespace: self.namespace.clone(),
            _value: PhantomData,
        }
    }
}

impl<V, S> LocalCacheStore<V, S>
where
    V: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        LocalCacheStore {
            store,
            namespace: namespace.into(),
            _value: PhantomData,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the cached value for `key`.
    pub fn get(&self, key: &str) -> Result<Option<V>, StorageUnavailable> {
        Ok(self.get_all()?.remove(key))
    }

    /// Persist `value` under `key`, overwriting any prior entry.
    pub fn set(&self, key: &str, value: &V) -> Result<(), StorageUnavailable> {
        let encoded = serde_json::to_value(value).map_err(|e| StorageUnavailable::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        self.store.update_item(&self.namespace, &mut |current| {
            let mut object = match current {
                Some(raw) => parse_object(&self.namespace, raw)?,
                None => serde_json::Map::new(),
            };
            object.insert(key.to_string(), encoded.clone());
            serde_json::to_string(&object).map_err(|e| StorageUnavailable::Encode {
                key: self.namespace.clone(),
                reason: e.to_string(),
            })
        })
    }

    /// Snapshot of the whole namespace, or a wholesale failure.
    pub fn get_all(&self) -> Result<HashMap<String, V>, StorageUnavailable> {
        match self.store.get_item(&self.namespace)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageUnavailable::Corrupted {
                key: self.namespace.clone(),
                reason: e.to_string(),
            }),
            None => Ok(HashMap::new()),
        }
    }
}

fn parse_object(
    namespace: &str,
    raw: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, StorageUnavailable> {
    serde_json::from_str(raw).map_err(|e| StorageUnavailable::Corrupted {
        key: namespace.to_string(),
        reason: e.to_string(),
    })
}
