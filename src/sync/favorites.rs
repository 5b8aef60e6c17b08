use crate::api::ApiClient;
use crate::session::Session;

use super::{RemoteSyncClient, SyncOutcome};

/// Confirms favorite flags: `true` creates the relation, `false` deletes it.
#[derive(Clone, Debug)]
pub struct FavoriteSync {
    api: ApiClient,
    session: Session,
}

impl FavoriteSync {
    pub fn new(api: ApiClient, session: Session) -> Self {
        FavoriteSync { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl RemoteSyncClient<bool> for FavoriteSync {
    async fn confirm(&self, movie_id: &str, favorite: &bool) -> SyncOutcome {
        let result = if *favorite {
            self.api.add_favorite(&self.session, movie_id).await
        } else {
            self.api.remove_favorite(&self.session, movie_id).await
        };
        SyncOutcome::from_result(result)
    }
}
