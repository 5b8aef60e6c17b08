use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::session::Session;

use super::types::{
    AuthResponse, Comment, CommentDelete, CommentRequest, CommentUpdate, Favorite,
    FavoriteRequest, LoginRequest, Movie, Rate, RateRequest, RegisterForm,
};
use super::ApiError;

/// Name of the header carrying the session token.
///
/// The service expects the raw token in a header literally called `token`,
/// not an `Authorization: Bearer` header.
pub const TOKEN_HEADER: &str = "token";

/// Typed client for the movie service.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;
        Ok(Self::with_http(http, &config.base_url))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn register(&self, form: &RegisterForm) -> Result<AuthResponse, ApiError> {
        self.fetch(self.request(Method::POST, "/auth/register").json(form))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.fetch(self.request(Method::POST, "/auth/login").json(&body))
            .await
    }

    // ========================================================================
    // Movies
    // ========================================================================

    pub async fn movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.fetch(self.request(Method::GET, "/movies")).await
    }

    pub async fn movie(&self, id: &str) -> Result<Movie, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/movies/{}", id)))
            .await
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub async fn favorites(&self, session: &Session) -> Result<Vec<Favorite>, ApiError> {
        let path = format!("/favorites/user/{}", session.user_id());
        let value: serde_json::Value = self
            .fetch(self.authed(Method::GET, &path, session))
            .await?;
        // The service answers with a non-array body when the user has none.
        if value.is_array() {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(Vec::new())
        }
    }

    pub async fn add_favorite(&self, session: &Session, movie_id: &str) -> Result<(), ApiError> {
        let body = favorite_body(session, movie_id);
        self.execute(self.authed(Method::POST, "/favorites", session).json(&body))
            .await
    }

    /// Body-scoped delete: the relation is identified by `{user, movie}`.
    pub async fn remove_favorite(&self, session: &Session, movie_id: &str) -> Result<(), ApiError> {
        let body = favorite_body(session, movie_id);
        self.execute(self.authed(Method::DELETE, "/favorites", session).json(&body))
            .await
    }

    // ========================================================================
    // Ratings
    // ========================================================================

    pub async fn rates(&self, session: Option<&Session>) -> Result<Vec<Rate>, ApiError> {
        let request = match session {
            Some(session) => self.authed(Method::GET, "/rates", session),
            None => self.request(Method::GET, "/rates"),
        };
        let value: serde_json::Value = self.fetch(request).await?;
        if value.is_array() {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(Vec::new())
        }
    }

    pub async fn rate(&self, session: &Session, movie_id: &str, value: u8) -> Result<(), ApiError> {
        let body = RateRequest {
            user: session.user_id().to_string(),
            movie: movie_id.to_string(),
            rating_value: value,
        };
        self.execute(self.authed(Method::POST, "/rates", session).json(&body))
            .await
    }

    pub async fn remove_rate(&self, session: &Session, movie_id: &str) -> Result<(), ApiError> {
        let body = favorite_body(session, movie_id);
        let path = format!("/rates/{}", movie_id);
        self.execute(self.authed(Method::DELETE, &path, session).json(&body))
            .await
    }

    // ========================================================================
    // Comments
    // ========================================================================

    pub async fn comments(
        &self,
        movie_id: &str,
        session: Option<&Session>,
    ) -> Result<Vec<Comment>, ApiError> {
        let request = match session {
            Some(session) => self.authed(Method::GET, "/comments", session),
            None => self.request(Method::GET, "/comments"),
        };
        self.fetch(request.query(&[("movie", movie_id)])).await
    }

    pub async fn post_comment(
        &self,
        session: &Session,
        movie_id: &str,
        content: &str,
    ) -> Result<(), ApiError> {
        let body = CommentRequest {
            user: session.user_id().to_string(),
            movie: movie_id.to_string(),
            content: content.to_string(),
        };
        self.execute(self.authed(Method::POST, "/comments", session).json(&body))
            .await
    }

    pub async fn update_comment(
        &self,
        session: &Session,
        comment_id: &str,
        content: &str,
    ) -> Result<(), ApiError> {
        let body = CommentUpdate {
            content: content.to_string(),
        };
        let path = format!("/comments/{}", comment_id);
        self.execute(self.authed(Method::PUT, &path, session).json(&body))
            .await
    }

    pub async fn delete_comment(&self, session: &Session, comment_id: &str) -> Result<(), ApiError> {
        let body = CommentDelete {
            user: session.user_id().to_string(),
        };
        let path = format!("/comments/{}", comment_id);
        self.execute(self.authed(Method::DELETE, &path, session).json(&body))
            .await
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.request(method, path).header(TOKEN_HEADER, session.token())
    }

    /// Send and decode a JSON body.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = check(request.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a mutation; the response body is not needed.
    async fn execute(&self, request: RequestBuilder) -> Result<(), ApiError> {
        check(request.send().await?).await?;
        Ok(())
    }
}

fn favorite_body(session: &Session, movie_id: &str) -> impl Serialize {
    FavoriteRequest {
        user: session.user_id().to_string(),
        movie: movie_id.to_string(),
    }
}

/// Turn a non-2xx response into `ApiError::Rejected`, keeping the service's
/// own message when it sent one.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            ["message", "error", "msg"]
                .iter()
                .find_map(|field| value.get(*field).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or(body);

    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}
