//! Comment thread for one movie.

use crate::api::{ApiClient, ApiError, Comment};
use crate::notify::{Notification, Notifier};
use crate::session::Session;
use crate::validation::{validate_comment, ValidationError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Comments of one movie as last fetched, plus the mutations on them.
///
/// A failed call leaves the local list as it was and publishes a
/// [`Notification::RequestFailed`].
pub struct CommentThread {
    api: ApiClient,
    session: Option<Session>,
    movie_id: String,
    comments: Vec<Comment>,
    notifier: Notifier,
}

impl CommentThread {
    pub fn new(
        api: ApiClient,
        movie_id: impl Into<String>,
        session: Option<Session>,
        notifier: Notifier,
    ) -> Self {
        CommentThread {
            api,
            session,
            movie_id: movie_id.into(),
            comments: Vec::new(),
            notifier,
        }
    }

    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Whether the logged-in user wrote `comment`.
    pub fn is_own(&self, comment: &Comment) -> bool {
        match (&self.session, comment.author_id()) {
            (Some(session), Some(author)) => session.user_id() == author,
            _ => false,
        }
    }

    pub async fn refresh(&mut self) -> Result<&[Comment], CommentError> {
        let fetched = self.api.comments(&self.movie_id, self.session.as_ref()).await;
        self.comments = self.report("load comments", fetched)?;
        log::debug!("{} comments for {}", self.comments.len(), self.movie_id);
        Ok(&self.comments)
    }

    /// Post a new comment, then re-fetch the thread.
    pub async fn post(&mut self, content: &str) -> Result<&[Comment], CommentError> {
        let content = validate_comment(content)?;
        let session = self.require_session()?;
        let posted = self
            .api
            .post_comment(&session, &self.movie_id, &content)
            .await;
        self.report("post comment", posted)?;
        self.refresh().await
    }

    pub async fn edit(&mut self, comment_id: &str, content: &str) -> Result<(), CommentError> {
        let content = validate_comment(content)?;
        let session = self.require_session()?;
        let updated = self
            .api
            .update_comment(&session, comment_id, &content)
            .await;
        self.report("edit comment", updated)?;

        if let Some(comment) = self.comments.iter_mut().find(|c| c.id == comment_id) {
            comment.content = content;
        }
        Ok(())
    }

    pub async fn delete(&mut self, comment_id: &str) -> Result<(), CommentError> {
        let session = self.require_session()?;
        let deleted = self.api.delete_comment(&session, comment_id).await;
        self.report("delete comment", deleted)?;

        self.comments.retain(|c| c.id != comment_id);
        Ok(())
    }

    fn require_session(&self) -> Result<Session, CommentError> {
        self.session
            .clone()
            .ok_or(CommentError::Api(ApiError::Unauthenticated))
    }

    fn report<T>(&self, action: &str, result: Result<T, ApiError>) -> Result<T, CommentError> {
        result.map_err(|e| {
            log::warn!("failed to {} on {}: {}", action, self.movie_id, e);
            self.notifier.notify(Notification::RequestFailed {
                action: action.to_string(),
                message: e.user_message(),
            });
            CommentError::Api(e)
        })
    }
}
