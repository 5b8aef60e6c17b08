//! HTTP access to the movie service.
//!
//! [`ApiClient`] wraps `reqwest` and speaks the service's JSON dialect:
//! `_id` identifiers, camelCase auth fields, body-scoped deletes and the
//! `token` header for authenticated calls.

mod client;
mod error;
mod types;

pub use client::{ApiClient, TOKEN_HEADER};
pub use error::ApiError;
pub use types::{
    AuthResponse, Comment, CommentDelete, CommentRequest, CommentUpdate, Favorite,
    FavoriteRequest, Identified, LoginRequest, Movie, MovieImage, Rate, RateRequest, Ref,
    RegisterForm, User,
};
