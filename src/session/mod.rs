//! The logged-in user's session.
//!
//! A [`Session`] is created by a successful login or registration, passed
//! explicitly to everything that talks to the service on the user's behalf,
//! and destroyed on logout. [`SessionStore`] persists its fields so a
//! restarted client can pick it back up.

mod session;
mod store;

pub use session::Session;
pub use store::{SessionStore, AUTH_TOKEN_KEY, USER_EMAIL_KEY, USER_ID_KEY, USER_ROLE_KEY};
