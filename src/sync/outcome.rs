use std::fmt;

use crate::api::ApiError;

/// Result of a [`RemoteSyncClient::confirm`](super::RemoteSyncClient::confirm) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Ack,
    Rejected(String),
    Unreachable(String),
}

/// The two non-`Ack` outcomes, both of which roll the local value back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncFailure {
    Rejected(String),
    /// The service may in fact have applied the change before the answer was
    /// lost; rolling back is a conservative guess.
    Unreachable(String),
}

impl SyncOutcome {
    /// Classify the result of a mutation call.
    pub fn from_result(result: Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => SyncOutcome::Ack,
            Err(ApiError::Unreachable(reason)) => SyncOutcome::Unreachable(reason),
            // The write went through; only the reply was unexpected.
            Err(ApiError::Decode(_)) => SyncOutcome::Ack,
            Err(err) => SyncOutcome::Rejected(err.user_message()),
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, SyncOutcome::Ack)
    }

    /// `None` for `Ack`, the failure otherwise.
    pub fn into_failure(self) -> Option<SyncFailure> {
        match self {
            SyncOutcome::Ack => None,
            SyncOutcome::Rejected(reason) => Some(SyncFailure::Rejected(reason)),
            SyncOutcome::Unreachable(reason) => Some(SyncFailure::Unreachable(reason)),
        }
    }
}

impl SyncFailure {
    pub fn reason(&self) -> &str {
        match self {
            SyncFailure::Rejected(reason) | SyncFailure::Unreachable(reason) => reason,
        }
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncFailure::Rejected(reason) => write!(f, "rejected: {}", reason),
            SyncFailure::Unreachable(reason) => write!(f, "unreachable: {}", reason),
        }
    }
}
