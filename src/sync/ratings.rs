use crate::api::ApiClient;
use crate::ratings::Rating;
use crate::session::Session;

use super::{RemoteSyncClient, SyncOutcome};

/// Confirms the user's rating of a movie: `Some` upserts it, `None` deletes it.
#[derive(Clone, Debug)]
pub struct RatingSync {
    api: ApiClient,
    session: Session,
}

impl RatingSync {
    pub fn new(api: ApiClient, session: Session) -> Self {
        RatingSync { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl RemoteSyncClient<Option<Rating>> for RatingSync {
    async fn confirm(&self, movie_id: &str, rating: &Option<Rating>) -> SyncOutcome {
        let result = match rating {
            Some(rating) => self.api.rate(&self.session, movie_id, rating.value()).await,
            None => self.api.remove_rate(&self.session, movie_id).await,
        };
        SyncOutcome::from_result(result)
    }
}
