/// The local store could not be read or written.
///
/// Callers of the cache treat this as a miss: it is logged, never shown to
/// the end user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageUnavailable {
    /// The backing file could not be read or written.
    #[error("storage io failed: {0}")]
    Io(String),
    /// A persisted value exists but does not deserialize.
    #[error("corrupted entry {key}: {reason}")]
    Corrupted { key: String, reason: String },
    /// A value could not be serialized for writing.
    #[error("failed to encode entry {key}: {reason}")]
    Encode { key: String, reason: String },
}

impl From<std::io::Error> for StorageUnavailable {
    fn from(err: std::io::Error) -> Self {
        StorageUnavailable::Io(err.to_string())
    }
}
