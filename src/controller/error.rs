use crate::lock::LockError;

/// The only error a mutation surfaces to its caller.
///
/// Remote and storage failures are reconciled inside the controller and
/// reported through [`Settled::outcome`](super::Settled) and notifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    /// A mutation for this entity is still in flight (reject policy).
    #[error("entity {0} is busy")]
    Busy(String),
}

impl From<LockError> for ToggleError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Busy(key) => ToggleError::Busy(key),
        }
    }
}
