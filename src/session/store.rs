use crate::store::{KeyValueStore, StorageUnavailable};

use super::Session;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_ID_KEY: &str = "userId";
pub const USER_ROLE_KEY: &str = "userRole";
pub const USER_EMAIL_KEY: &str = "userEmail";

const SESSION_KEYS: [&str; 4] = [AUTH_TOKEN_KEY, USER_ID_KEY, USER_ROLE_KEY, USER_EMAIL_KEY];

/// Persists a [`Session`] as four keys, written and removed together.
#[derive(Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        SessionStore { store }
    }

    /// Write every session field in one batch.
    ///
    /// Optional fields that are absent are written as empty strings so the
    /// four keys always appear and disappear together.
    pub fn save(&self, session: &Session) -> Result<(), StorageUnavailable> {
        self.store.set_items(&[
            (AUTH_TOKEN_KEY, session.token()),
            (USER_ID_KEY, session.user_id()),
            (USER_ROLE_KEY, session.role().unwrap_or_default()),
            (USER_EMAIL_KEY, session.email().unwrap_or_default()),
        ])
    }

    /// Load the persisted session. Present only when both the token and the
    /// user id are.
    pub fn load(&self) -> Result<Option<Session>, StorageUnavailable> {
        let token = non_empty(self.store.get_item(AUTH_TOKEN_KEY)?);
        let user_id = non_empty(self.store.get_item(USER_ID_KEY)?);
        let (Some(token), Some(user_id)) = (token, user_id) else {
            return Ok(None);
        };

        let mut session = Session::new(token, user_id);
        if let Some(role) = non_empty(self.store.get_item(USER_ROLE_KEY)?) {
            session = session.with_role(role);
        }
        if let Some(email) = non_empty(self.store.get_item(USER_EMAIL_KEY)?) {
            session = session.with_email(email);
        }
        Ok(Some(session))
    }

    /// Remove every session field in one batch.
    pub fn clear(&self) -> Result<(), StorageUnavailable> {
        self.store.remove_items(&SESSION_KEYS)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
