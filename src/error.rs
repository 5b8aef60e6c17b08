use crate::api::ApiError;
use crate::config::ConfigError;
use crate::store::StorageUnavailable;

/// Failure to assemble a [`MovieClient`](crate::MovieClient).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageUnavailable),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no storage path configured")]
    MissingStoragePath,
}
