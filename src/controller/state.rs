use crate::sync::SyncFailure;

/// Where the value currently shown for an entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Read from the cache or the service, or acknowledged by the service.
    ServerConfirmed,
    /// Applied locally, confirmation in flight.
    OptimisticPending,
    /// Restored after the service did not confirm a change.
    OptimisticRollback,
}

/// The value shown for an entity, with its provenance. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleState<V> {
    pub entity_id: String,
    pub value: V,
    pub source: Provenance,
}

impl<V> ToggleState<V> {
    pub fn confirmed(entity_id: impl Into<String>, value: V) -> Self {
        ToggleState {
            entity_id: entity_id.into(),
            value,
            source: Provenance::ServerConfirmed,
        }
    }
}

/// A change between its optimistic application and its settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation<V> {
    pub entity_id: String,
    pub previous_value: V,
    pub next_value: V,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    Confirmed,
    RolledBack(SyncFailure),
}

/// How a mutation ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<V> {
    pub entity_id: String,
    /// Value before the mutation.
    pub previous: V,
    /// Value the mutation tried to apply.
    pub requested: V,
    /// Value shown now: `requested` when confirmed, `previous` when rolled back.
    pub value: V,
    pub outcome: SettleOutcome,
}

impl<V> Settled<V> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self.outcome, SettleOutcome::Confirmed)
    }

    pub fn failure(&self) -> Option<&SyncFailure> {
        match &self.outcome {
            SettleOutcome::Confirmed => None,
            SettleOutcome::RolledBack(failure) => Some(failure),
        }
    }
}

/// Values with a natural "other" state, so they can be toggled without an
/// explicit target.
pub trait Toggle {
    fn toggled(&self) -> Self;
}

impl Toggle for bool {
    fn toggled(&self) -> Self {
        !*self
    }
}
