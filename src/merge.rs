//! Merging an authoritative server list with locally cached overrides.
//!
//! The cache augments entities the server already listed; it never adds
//! entities to the list.

use std::collections::HashMap;

use crate::api::Favorite;

/// A listed item with the value to render for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T, V> {
    pub item: T,
    pub value: V,
    /// `true` when `value` came from the cache rather than the server.
    pub overridden: bool,
}

/// Pair every server item with its cached value when one exists, else with
/// `server_value(item)`. Items without a key are kept with their server value.
pub fn merge_with_overrides<T, V, K, F>(
    items: Vec<T>,
    overrides: &HashMap<String, V>,
    key: K,
    server_value: F,
) -> Vec<Merged<T, V>>
where
    V: Clone,
    K: Fn(&T) -> Option<&str>,
    F: Fn(&T) -> V,
{
    items
        .into_iter()
        .map(|item| {
            let cached = key(&item).and_then(|key| overrides.get(key)).cloned();
            match cached {
                Some(value) => Merged {
                    item,
                    value,
                    overridden: true,
                },
                None => {
                    let value = server_value(&item);
                    Merged {
                        item,
                        value,
                        overridden: false,
                    }
                }
            }
        })
        .collect()
}

/// Merge the user's favorites list with cached favorite flags. Everything the
/// server lists is a favorite unless the cache says otherwise.
pub fn merge_favorites(
    server: Vec<Favorite>,
    cached: &HashMap<String, bool>,
) -> Vec<Merged<Favorite, bool>> {
    merge_with_overrides(server, cached, Favorite::movie_id, |_| true)
}
