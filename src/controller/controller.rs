use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::cache::LocalCacheStore;
use crate::lock::{EntityLocks, GuardPolicy};
use crate::notify::{Notification, Notifier};
use crate::store::KeyValueStore;
use crate::sync::{RemoteSyncClient, SyncOutcome};

use super::{PendingMutation, Provenance, SettleOutcome, Settled, Toggle, ToggleError, ToggleState};

/// Generic optimistic controller, parameterised by the value type `V`, the
/// store `S` backing its cache namespace and the remote confirmer `R`.
///
/// Cheap to clone; clones share the mirror, the cache, the remote client and
/// the entity guards.
pub struct OptimisticToggleController<V, S, R> {
    shared: Arc<Shared<V, S, R>>,
    locks: Arc<EntityLocks>,
    policy: GuardPolicy,
    notifier: Notifier,
}

struct Shared<V, S, R> {
    cache: LocalCacheStore<V, S>,
    remote: R,
    mirror: Mutex<HashMap<String, ToggleState<V>>>,
    /// Bumped when a mutation starts and when it settles. Held while seeding
    /// so a seed cannot interleave with either transition.
    generations: Mutex<HashMap<String, u64>>,
}

impl<V, S, R> Clone for OptimisticToggleController<V, S, R> {
    fn clone(&self) -> Self {
        OptimisticToggleController {
            shared: self.shared.clone(),
            locks: self.locks.clone(),
            policy: self.policy,
            notifier: self.notifier.clone(),
        }
    }
}

impl<V, S, R> OptimisticToggleController<V, S, R>
where
    V: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: KeyValueStore + 'static,
    R: RemoteSyncClient<V> + 'static,
{
    pub fn new(cache: LocalCacheStore<V, S>, remote: R) -> Self {
        OptimisticToggleController {
            shared: Arc::new(Shared {
                cache,
                remote,
                mirror: Mutex::new(HashMap::new()),
                generations: Mutex::new(HashMap::new()),
            }),
            locks: Arc::new(EntityLocks::new()),
            policy: GuardPolicy::default(),
            notifier: Notifier::new(),
        }
    }

    pub fn with_policy(mut self, policy: GuardPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Share entity guards with other controllers over the same namespace.
    pub fn with_locks(mut self, locks: Arc<EntityLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    pub fn namespace(&self) -> &str {
        self.shared.cache.namespace()
    }

    pub fn cache(&self) -> &LocalCacheStore<V, S> {
        &self.shared.cache
    }

    pub fn remote(&self) -> &R {
        &self.shared.remote
    }

    /// Value to render for `entity_id`.
    pub fn current(&self, entity_id: &str) -> V {
        self.state(entity_id).value
    }

    /// Value to render for `entity_id`, with its provenance.
    ///
    /// The first access seeds the mirror from the cache; an unreadable cache
    /// counts as a miss and yields `V::default()`.
    pub fn state(&self, entity_id: &str) -> ToggleState<V> {
        if let Some(state) = self.mirror().get(entity_id) {
            return state.clone();
        }

        let value = self.read_cache(entity_id).unwrap_or_default();
        self.mirror()
            .entry(entity_id.to_string())
            .or_insert_with(|| ToggleState::confirmed(entity_id, value))
            .clone()
    }

    /// Whether a mutation for `entity_id` is in flight.
    pub fn is_pending(&self, entity_id: &str) -> bool {
        self.locks.is_held(&self.lock_key(entity_id))
    }

    /// Mutation generation of `entity_id`. Capture it before a fetch and
    /// hand it to [`seed_if_unchanged`](Self::seed_if_unchanged).
    pub fn generation(&self, entity_id: &str) -> u64 {
        lock(&self.shared.generations)
            .get(entity_id)
            .copied()
            .unwrap_or_default()
    }

    /// Record a value learned from the service, without confirming anything.
    ///
    /// Ignored (returns `false`) while a mutation for the entity is pending,
    /// so a fetch cannot overwrite an optimistic value mid-flight.
    pub fn seed(&self, entity_id: &str, value: V) -> bool {
        let _generations = lock(&self.shared.generations);
        self.seed_locked(entity_id, value)
    }

    /// [`seed`](Self::seed) a value fetched when the entity was at
    /// generation `seen`.
    ///
    /// Also ignored when a mutation started or settled since then: the
    /// snapshot predates it and would undo a newer value.
    pub fn seed_if_unchanged(&self, entity_id: &str, value: V, seen: u64) -> bool {
        let generations = lock(&self.shared.generations);
        let current = generations.get(entity_id).copied().unwrap_or_default();
        if current != seen {
            log::debug!(
                "{}: dropping stale snapshot of {} (generation {} < {})",
                self.namespace(),
                entity_id,
                seen,
                current
            );
            return false;
        }
        self.seed_locked(entity_id, value)
    }

    fn seed_locked(&self, entity_id: &str, value: V) -> bool {
        if self.is_pending(entity_id) {
            log::debug!(
                "{}: not seeding {} while a mutation is pending",
                self.namespace(),
                entity_id
            );
            return false;
        }
        self.apply(entity_id, value, Provenance::ServerConfirmed);
        true
    }

    /// [`seed`](Self::seed) every entry; returns how many were applied.
    pub fn seed_all<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = (String, V)>,
    {
        values
            .into_iter()
            .filter(|(entity_id, value)| self.seed(entity_id, value.clone()))
            .count()
    }

    /// Flip the current value and confirm it remotely.
    pub async fn toggle(&self, entity_id: &str) -> Result<Settled<V>, ToggleError>
    where
        V: Toggle,
    {
        self.mutate(entity_id, |current| current.toggled()).await
    }

    /// Apply an explicit value and confirm it remotely.
    ///
    /// Confirms even when `value` equals the current value: the service is
    /// authoritative.
    pub async fn set(&self, entity_id: &str, value: V) -> Result<Settled<V>, ToggleError> {
        self.mutate(entity_id, move |_| value).await
    }

    /// [`toggle`](Self::toggle) as a detached task.
    ///
    /// Dropping the handle does not cancel the mutation: the remote call
    /// completes and reconciles the cache even if the caller is gone.
    pub fn spawn_toggle(
        &self,
        entity_id: impl Into<String>,
    ) -> JoinHandle<Result<Settled<V>, ToggleError>>
    where
        V: Toggle,
    {
        let controller = self.clone();
        let entity_id = entity_id.into();
        tokio::spawn(async move { controller.toggle(&entity_id).await })
    }

    /// [`set`](Self::set) as a detached task. See [`spawn_toggle`](Self::spawn_toggle).
    pub fn spawn_set(
        &self,
        entity_id: impl Into<String>,
        value: V,
    ) -> JoinHandle<Result<Settled<V>, ToggleError>> {
        let controller = self.clone();
        let entity_id = entity_id.into();
        tokio::spawn(async move { controller.set(&entity_id, value).await })
    }

    async fn mutate<F>(&self, entity_id: &str, next: F) -> Result<Settled<V>, ToggleError>
    where
        F: FnOnce(&V) -> V,
    {
        // Released on every exit path, including unwinding out of `confirm`.
        let _permit = self
            .locks
            .acquire(&self.lock_key(entity_id), self.policy)
            .await?;

        let pending = {
            let mut generations = lock(&self.shared.generations);
            *generations.entry(entity_id.to_string()).or_default() += 1;

            let previous_value = self.current(entity_id);
            let pending = PendingMutation {
                entity_id: entity_id.to_string(),
                next_value: next(&previous_value),
                previous_value,
            };
            self.apply(
                &pending.entity_id,
                pending.next_value.clone(),
                Provenance::OptimisticPending,
            );
            pending
        };
        log::debug!("{}: {} pending", self.namespace(), pending.entity_id);

        let outcome = self
            .shared
            .remote
            .confirm(&pending.entity_id, &pending.next_value)
            .await;

        Ok(self.settle(pending, outcome))
    }

    fn settle(&self, pending: PendingMutation<V>, outcome: SyncOutcome) -> Settled<V> {
        let PendingMutation {
            entity_id,
            previous_value,
            next_value,
        } = pending;

        let mut generations = lock(&self.shared.generations);
        *generations.entry(entity_id.clone()).or_default() += 1;

        match outcome.into_failure() {
            None => {
                self.set_mirror(&entity_id, next_value.clone(), Provenance::ServerConfirmed);
                log::debug!("{}: {} confirmed", self.namespace(), entity_id);
                Settled {
                    entity_id,
                    previous: previous_value,
                    requested: next_value.clone(),
                    value: next_value,
                    outcome: SettleOutcome::Confirmed,
                }
            }
            Some(failure) => {
                log::warn!(
                    "{}: rolling back {} ({})",
                    self.namespace(),
                    entity_id,
                    failure
                );
                self.apply(
                    &entity_id,
                    previous_value.clone(),
                    Provenance::OptimisticRollback,
                );
                self.notifier.notify(Notification::MutationRolledBack {
                    namespace: self.namespace().to_string(),
                    entity_id: entity_id.clone(),
                    reason: failure.reason().to_string(),
                });
                Settled {
                    entity_id,
                    previous: previous_value.clone(),
                    requested: next_value,
                    value: previous_value,
                    outcome: SettleOutcome::RolledBack(failure),
                }
            }
        }
    }

    /// Write to the mirror and the cache. A cache failure is logged and
    /// otherwise ignored; the mirror still reflects the value.
    fn apply(&self, entity_id: &str, value: V, source: Provenance) {
        if let Err(e) = self.shared.cache.set(entity_id, &value) {
            log::warn!(
                "{}: cache write for {} failed, value is not durable: {}",
                self.namespace(),
                entity_id,
                e
            );
        }
        self.set_mirror(entity_id, value, source);
    }

    fn set_mirror(&self, entity_id: &str, value: V, source: Provenance) {
        self.mirror().insert(
            entity_id.to_string(),
            ToggleState {
                entity_id: entity_id.to_string(),
                value,
                source,
            },
        );
    }

    fn read_cache(&self, entity_id: &str) -> Option<V> {
        match self.shared.cache.get(entity_id) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "{}: cache read for {} failed, treating as miss: {}",
                    self.namespace(),
                    entity_id,
                    e
                );
                None
            }
        }
    }

    fn mirror(&self) -> MutexGuard<'_, HashMap<String, ToggleState<V>>> {
        lock(&self.shared.mirror)
    }

    fn lock_key(&self, entity_id: &str) -> String {
        format!("{}:{}", self.namespace(), entity_id)
    }
}

// Every write replaces a whole entry, so a poisoned map is still coherent.
fn lock<T>(map: &Mutex<T>) -> MutexGuard<'_, T> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}
