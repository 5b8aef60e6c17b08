use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use super::key_value::UpdateFn;
use super::{KeyValueStore, StorageUnavailable};

/// Durable store persisted as a single JSON object on disk.
///
/// Reads are served from memory. Every write rewrites the file through a
/// temporary sibling and a rename, and only updates memory once the rename
/// succeeded, so a failed write leaves both the file and the view unchanged.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<FileInner>,
}

struct FileInner {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store; an unparsable one is
    /// `StorageUnavailable::Corrupted`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageUnavailable> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageUnavailable::Corrupted {
                    key: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("opened file store {} ({} keys)", path.display(), entries.len());

        Ok(FileStore {
            inner: Arc::new(FileInner {
                path,
                entries: RwLock::new(entries),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Apply `change` to a copy of the entries, persist it, then publish it.
    fn write_with<F>(&self, change: F) -> Result<(), StorageUnavailable>
    where
        F: FnOnce(&mut HashMap<String, String>) -> Result<(), StorageUnavailable>,
    {
        let mut entries = self
            .inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        change(&mut next)?;
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageUnavailable> {
        let path = &self.inner.path;
        let encoded = serde_json::to_string(entries).map_err(|e| StorageUnavailable::Encode {
            key: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = temp_sibling(path);
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// `path` with `.tmp` appended, so it never names `path` itself.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageUnavailable> {
        let entries = self
            .inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageUnavailable> {
        self.write_with(|entries| {
            for (key, value) in items {
                entries.insert(key.to_string(), value.to_string());
            }
            Ok(())
        })
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageUnavailable> {
        self.write_with(|entries| {
            for key in keys {
                entries.remove(*key);
            }
            Ok(())
        })
    }

    fn update_item(&self, key: &str, update: &mut UpdateFn<'_>) -> Result<(), StorageUnavailable> {
        self.write_with(|entries| {
            let next = update(entries.get(key).map(String::as_str))?;
            entries.insert(key.to_string(), next);
            Ok(())
        })
    }
}
