use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What happens when a mutation is requested for an entity that already has
/// one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardPolicy {
    /// Wait for the in-flight mutation to settle, then run against the
    /// settled value.
    #[default]
    Queue,
    /// Refuse immediately with a busy signal and change nothing.
    Reject,
}

impl fmt::Display for GuardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardPolicy::Queue => write!(f, "queue"),
            GuardPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for GuardPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" => Ok(GuardPolicy::Queue),
            "reject" => Ok(GuardPolicy::Reject),
            other => Err(format!("unknown guard policy: {}", other)),
        }
    }
}
