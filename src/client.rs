//! Entry point wiring configuration, transport, storage and notifications
//! into the per-feature services.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{ApiClient, ApiError, Movie};
use crate::auth::AuthService;
use crate::comments::CommentThread;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::favorites::FavoritesBoard;
use crate::lock::EntityLocks;
use crate::notify::{Notification, Notifier};
use crate::ratings::RatingBoard;
use crate::session::Session;
use crate::store::{InMemoryStore, KeyValueStore};

#[cfg(feature = "file-store")]
use crate::store::FileStore;

/// One client per running application.
///
/// Boards are cached per session: every caller asking for the favorites or
/// ratings of the same session gets a clone of the same board, so screens
/// share the mirror and the in-flight guards. The guards outlive a session
/// change, since every board of a namespace writes the same cache entries.
pub struct MovieClient<S> {
    config: ClientConfig,
    api: ApiClient,
    store: S,
    notifier: Notifier,
    favorites: Mutex<Option<FavoritesBoard<S>>>,
    ratings: Mutex<Option<RatingBoard<S>>>,
    favorite_locks: Arc<EntityLocks>,
    rating_locks: Arc<EntityLocks>,
}

impl MovieClient<InMemoryStore> {
    /// Client whose local state lives only as long as the process.
    pub fn in_memory(config: ClientConfig) -> Result<Self, ClientError> {
        Self::new(config, InMemoryStore::new())
    }
}

#[cfg(feature = "file-store")]
impl MovieClient<FileStore> {
    /// Client backed by the file at `config.storage_path`.
    pub fn open(config: ClientConfig) -> Result<Self, ClientError> {
        let path = config
            .storage_path
            .clone()
            .ok_or(ClientError::MissingStoragePath)?;
        let store = FileStore::open(&path)?;
        log::info!("opened local store at {}", path.display());
        Self::new(config, store)
    }
}

impl<S: KeyValueStore + Clone + 'static> MovieClient<S> {
    pub fn new(config: ClientConfig, store: S) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config)?;
        Ok(Self::with_api(config, api, store))
    }

    /// Use a prebuilt transport instead of one derived from `config`.
    pub fn with_api(config: ClientConfig, api: ApiClient, store: S) -> Self {
        MovieClient {
            config,
            api,
            store,
            notifier: Notifier::new(),
            favorites: Mutex::new(None),
            ratings: Mutex::new(None),
            favorite_locks: Arc::new(EntityLocks::new()),
            rating_locks: Arc::new(EntityLocks::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub fn auth(&self) -> AuthService<S> {
        AuthService::new(self.api.clone(), self.store.clone(), self.notifier.clone())
    }

    /// The movie list, or a notification and the error.
    pub async fn movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.api.movies().await.inspect_err(|e| {
            self.notifier.notify(Notification::RequestFailed {
                action: "load movies".into(),
                message: e.user_message(),
            });
        })
    }

    pub async fn movie(&self, id: &str) -> Result<Movie, ApiError> {
        self.api.movie(id).await.inspect_err(|e| {
            self.notifier.notify(Notification::RequestFailed {
                action: "load movie".into(),
                message: e.user_message(),
            });
        })
    }

    pub fn favorites(&self, session: &Session) -> FavoritesBoard<S> {
        let mut cached = lock(&self.favorites);
        match cached.as_ref() {
            Some(board) if board.session() == session => board.clone(),
            _ => {
                let board = FavoritesBoard::new(
                    self.api.clone(),
                    session.clone(),
                    self.store.clone(),
                    self.notifier.clone(),
                )
                .with_policy(self.config.guard_policy)
                .with_locks(self.favorite_locks.clone());
                *cached = Some(board.clone());
                board
            }
        }
    }

    pub fn ratings(&self, session: &Session) -> RatingBoard<S> {
        let mut cached = lock(&self.ratings);
        match cached.as_ref() {
            Some(board) if board.session() == session => board.clone(),
            _ => {
                let board = RatingBoard::new(
                    self.api.clone(),
                    session.clone(),
                    self.store.clone(),
                    self.notifier.clone(),
                )
                .with_policy(self.config.guard_policy)
                .with_locks(self.rating_locks.clone());
                *cached = Some(board.clone());
                board
            }
        }
    }

    /// A fresh, empty thread; call [`CommentThread::refresh`] to load it.
    pub fn comments(&self, movie_id: &str, session: Option<&Session>) -> CommentThread {
        CommentThread::new(
            self.api.clone(),
            movie_id,
            session.cloned(),
            self.notifier.clone(),
        )
    }
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
