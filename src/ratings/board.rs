use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::cache::{LocalCacheStore, RATINGS_NAMESPACE};
use crate::controller::{OptimisticToggleController, Settled, ToggleError};
use crate::lock::{EntityLocks, GuardPolicy};
use crate::notify::Notifier;
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::sync::RatingSync;

use super::{Rating, RatingSummary};

type RatingController<S> = OptimisticToggleController<Option<Rating>, S, RatingSync>;

/// Result of rating (or un-rating) a movie.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingUpdate {
    pub settled: Settled<Option<Rating>>,
    /// Aggregate re-read from the service after the change settled. `None`
    /// when that refresh failed.
    pub summary: Option<RatingSummary>,
}

/// The current user's ratings, applied optimistically, with the aggregate
/// re-derived from the service each time a change settles.
pub struct RatingBoard<S> {
    api: ApiClient,
    controller: RatingController<S>,
}

impl<S> Clone for RatingBoard<S> {
    fn clone(&self) -> Self {
        RatingBoard {
            api: self.api.clone(),
            controller: self.controller.clone(),
        }
    }
}

impl<S: KeyValueStore + 'static> RatingBoard<S> {
    pub fn new(api: ApiClient, session: Session, store: S, notifier: Notifier) -> Self {
        let controller = OptimisticToggleController::new(
            LocalCacheStore::new(store, RATINGS_NAMESPACE),
            RatingSync::new(api.clone(), session),
        )
        .with_notifier(notifier);
        RatingBoard { api, controller }
    }

    pub fn with_policy(mut self, policy: GuardPolicy) -> Self {
        self.controller = self.controller.with_policy(policy);
        self
    }

    pub fn with_locks(mut self, locks: Arc<EntityLocks>) -> Self {
        self.controller = self.controller.with_locks(locks);
        self
    }

    pub fn session(&self) -> &Session {
        self.controller.remote().session()
    }

    pub fn controller(&self) -> &RatingController<S> {
        &self.controller
    }

    /// The user's rating as currently shown (optimistic while pending).
    pub fn user_rating(&self, movie_id: &str) -> Option<Rating> {
        self.controller.current(movie_id)
    }

    /// Fetch every rate, derive the movie's aggregate and record the user's
    /// own rating as server-confirmed.
    ///
    /// The user's rating is only recorded if no change to it started or
    /// settled while the fetch was in flight.
    pub async fn summary(&self, movie_id: &str) -> Result<RatingSummary, ApiError> {
        let session = self.session();
        let seen = self.controller.generation(movie_id);
        let rates = self.api.rates(Some(session)).await?;
        let summary = RatingSummary::from_rates(&rates, movie_id, Some(session.user_id()));
        self.controller
            .seed_if_unchanged(movie_id, summary.user_rating, seen);
        Ok(summary)
    }

    pub async fn rate(&self, movie_id: &str, rating: Rating) -> Result<RatingUpdate, ToggleError> {
        self.update(movie_id, Some(rating)).await
    }

    /// Remove the user's rating.
    pub async fn clear(&self, movie_id: &str) -> Result<RatingUpdate, ToggleError> {
        self.update(movie_id, None).await
    }

    async fn update(
        &self,
        movie_id: &str,
        rating: Option<Rating>,
    ) -> Result<RatingUpdate, ToggleError> {
        let settled = self.controller.set(movie_id, rating).await?;

        // Read-through refresh on returning to idle.
        let summary = match self.summary(movie_id).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::warn!("failed to refresh ratings for {}: {}", movie_id, e);
                None
            }
        };

        Ok(RatingUpdate { settled, summary })
    }
}
