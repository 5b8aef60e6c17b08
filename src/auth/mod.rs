//! Login, registration and logout.
//!
//! A successful login or registration creates the [`Session`] and persists
//! its fields together. A banned account never gets a session: nothing is
//! written and a notification is published.

use crate::api::{ApiClient, ApiError, AuthResponse, RegisterForm};
use crate::notify::{Notification, Notifier};
use crate::session::{Session, SessionStore};
use crate::store::{KeyValueStore, StorageUnavailable};
use crate::validation::{validate_login, validate_register, ValidationError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("account is banned")]
    Banned,
    /// The service accepted the credentials but left out a required field.
    #[error("auth response is missing {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageUnavailable),
}

pub struct AuthService<S> {
    api: ApiClient,
    sessions: SessionStore<S>,
    notifier: Notifier,
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(api: ApiClient, store: S, notifier: Notifier) -> Self {
        AuthService {
            api,
            sessions: SessionStore::new(store),
            notifier,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        validate_login(email, password)?;
        let email = email.trim();
        let response = self.api.login(email, password).await?;
        self.establish(email, response)
    }

    /// Create an account and log straight into it.
    pub async fn register(&self, form: &RegisterForm) -> Result<Session, AuthError> {
        validate_register(form)?;
        let form = RegisterForm {
            email: form.email.trim().to_string(),
            ..form.clone()
        };
        let response = self.api.register(&form).await?;
        self.establish(&form.email, response)
    }

    /// Remove every persisted session field at once.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        log::info!("logged out");
        Ok(())
    }

    /// Session left behind by a previous run, if any.
    pub fn restore(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.load()?)
    }

    fn establish(&self, email: &str, response: AuthResponse) -> Result<Session, AuthError> {
        if response.is_banned() {
            log::info!("login refused for banned account {}", email);
            self.notifier.notify(Notification::AccountBanned {
                email: email.to_string(),
            });
            return Err(AuthError::Banned);
        }

        let token = response.token.ok_or(AuthError::MissingField("token"))?;
        let user_id = response.user_id.ok_or(AuthError::MissingField("userId"))?;

        let mut session = Session::new(token, user_id).with_email(email);
        if let Some(role) = response.role {
            session = session.with_role(role);
        }

        self.sessions.save(&session)?;
        log::info!("logged in as {}", session.user_id());
        Ok(session)
    }
}
