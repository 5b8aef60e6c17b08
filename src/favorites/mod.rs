//! The current user's favorite movies.

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError, Favorite};
use crate::cache::{LocalCacheStore, FAVORITES_NAMESPACE};
use crate::controller::{OptimisticToggleController, Settled, ToggleError};
use crate::lock::{EntityLocks, GuardPolicy};
use crate::merge::{merge_favorites, Merged};
use crate::notify::{Notification, Notifier};
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::sync::FavoriteSync;

type FavoriteController<S> = OptimisticToggleController<bool, S, FavoriteSync>;

/// Favorites list and per-movie favorite flags for one session.
///
/// The list screen and the movie-detail screen should share one board (or
/// clones of it) so they share the in-memory mirror and the entity guards.
pub struct FavoritesBoard<S> {
    api: ApiClient,
    controller: FavoriteController<S>,
    notifier: Notifier,
}

impl<S> Clone for FavoritesBoard<S> {
    fn clone(&self) -> Self {
        FavoritesBoard {
            api: self.api.clone(),
            controller: self.controller.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<S: KeyValueStore + 'static> FavoritesBoard<S> {
    pub fn new(api: ApiClient, session: Session, store: S, notifier: Notifier) -> Self {
        let controller = OptimisticToggleController::new(
            LocalCacheStore::new(store, FAVORITES_NAMESPACE),
            FavoriteSync::new(api.clone(), session),
        )
        .with_notifier(notifier.clone());
        FavoritesBoard {
            api,
            controller,
            notifier,
        }
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

    pub fn controller(&self) -> &FavoriteController<S> {
        &self.controller
    }

    /// Whether the movie is shown as a favorite (optimistic while pending).
    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.controller.current(movie_id)
    }

    pub async fn toggle(&self, movie_id: &str) -> Result<Settled<bool>, ToggleError> {
        self.controller.toggle(movie_id).await
    }

    /// Fetch the user's favorites and merge them with cached flags.
    ///
    /// An unreadable cache degrades to the plain server list.
    pub async fn list(&self) -> Result<Vec<Merged<Favorite, bool>>, ApiError> {
        let server = match self.api.favorites(self.session()).await {
            Ok(server) => server,
            Err(e) => {
                self.notifier.notify(Notification::RequestFailed {
                    action: "load favorites".into(),
                    message: e.user_message(),
                });
                return Err(e);
            }
        };

        let cached = self.controller.cache().get_all().unwrap_or_else(|e| {
            log::warn!("favorites cache unreadable, showing server list: {}", e);
            HashMap::new()
        });

        Ok(merge_favorites(server, &cached))
    }
}
