//! Transient, user-facing notifications.
//!
//! Rollbacks, bans and failed requests are published here instead of being
//! returned as errors from the screens' point of view. Any number of
//! subscribers may listen; publishing with no subscriber is not an error.

use std::fmt;

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// An optimistic change was reverted because the service did not confirm it.
    MutationRolledBack {
        namespace: String,
        entity_id: String,
        reason: String,
    },
    /// Login was refused because the account is banned.
    AccountBanned { email: String },
    /// A non-optimistic request failed (posting a comment, loading a list).
    RequestFailed { action: String, message: String },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::MutationRolledBack {
                namespace, reason, ..
            } => write!(f, "Could not save your change to {}: {}", label(namespace), reason),
            Notification::AccountBanned { .. } => {
                write!(f, "Your account has been banned. Please contact support.")
            }
            Notification::RequestFailed { action, message } => {
                write!(f, "Failed to {}: {}", action, message)
            }
        }
    }
}

fn label(namespace: &str) -> &str {
    match namespace {
        crate::cache::FAVORITES_NAMESPACE => "favorites",
        crate::cache::RATINGS_NAMESPACE => "ratings",
        other => other,
    }
}

/// Fan-out publisher of [`Notification`]s. Clones share subscribers.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Slow subscribers lag (and skip) once `capacity` notifications are queued.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Notifier { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn notify(&self, notification: Notification) {
        log::debug!("notify: {}", notification);
        // No receivers is fine: nobody is looking at the screen.
        let _ = self.tx.send(notification);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
