/// Error type for guard acquisition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    /// Another mutation for this key is still in flight and the guard policy
    /// refuses to wait for it.
    #[error("entity {0} has a mutation in flight")]
    Busy(String),
}
