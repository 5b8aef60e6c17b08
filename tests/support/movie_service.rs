//! In-process stand-in for the movie REST service.
//!
//! Binds an axum router to `127.0.0.1:0` and keeps its data in memory so
//! tests can inspect what the client actually sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use reelsync::api::{ApiClient, TOKEN_HEADER};
use reelsync::ClientConfig;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub status: String,
}

impl UserRecord {
    pub fn token(&self) -> String {
        format!("token-{}", self.id)
    }
}

/// One request as the service saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub token: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct ServiceState {
    pub movies: Vec<Value>,
    pub users: Vec<UserRecord>,
    /// `(user, movie)` pairs.
    pub favorites: Vec<(String, String)>,
    pub rates: Vec<Value>,
    pub comments: Vec<Value>,
    pub requests: Vec<Recorded>,
    /// Refuse the next authenticated mutation with this status and message.
    pub reject_next: Option<(u16, String)>,
    /// Hold the next `GET /rates` response for this long. The body is the
    /// state at arrival.
    pub delay_next_rates: Option<Duration>,
    next_id: u64,
}

impl ServiceState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<UserRecord> {
        let token = headers.get(TOKEN_HEADER)?.to_str().ok()?;
        self.users.iter().find(|u| u.token() == token).cloned()
    }
}

type Shared = Arc<Mutex<ServiceState>>;

pub struct MovieService {
    state: Shared,
    base_url: String,
}

impl MovieService {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(ServiceState::default()));
        {
            let mut st = state.lock().unwrap();
            st.movies = vec![
                movie("m1", "The Matrix", "Sci-Fi", "1999-03-31"),
                movie("m2", "Arrival", "Sci-Fi", "2016-11-11"),
                movie("m3", "Heat", "Crime", "1995-12-15"),
            ];
        }

        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MovieService {
            state,
            base_url: format!("http://{addr}/api"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url).with_timeout(Duration::from_secs(2))
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config()).unwrap()
    }

    pub fn state(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, id: &str, email: &str, password: &str, status: &str) -> UserRecord {
        let user = UserRecord {
            id: id.into(),
            email: email.into(),
            password: password.into(),
            role: "user".into(),
            status: status.into(),
        };
        self.state().users.push(user.clone());
        user
    }

    pub fn reject_next(&self, status: u16, message: &str) {
        self.state().reject_next = Some((status, message.to_string()));
    }

    pub fn delay_next_rates(&self, delay: Duration) {
        self.state().delay_next_rates = Some(delay);
    }

    pub fn rate_of(&self, user: &str, movie: &str) -> Option<u64> {
        self.state()
            .rates
            .iter()
            .find(|rate| rate["user"] == user && rate["movie"] == movie)
            .and_then(|rate| rate["ratingValue"].as_u64())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state().requests.clone()
    }

    pub fn favorites_of(&self, user: &str) -> Vec<String> {
        self.state()
            .favorites
            .iter()
            .filter(|(u, _)| u == user)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn add_rate(&self, user: &str, movie: &str, value: u8) {
        let mut st = self.state();
        let id = st.next_id("r");
        st.rates.push(json!({ "_id": id, "user": user, "movie": movie, "ratingValue": value }));
    }

    pub fn add_comment(&self, user: &str, movie: &str, content: &str) -> String {
        let mut st = self.state();
        let id = st.next_id("c");
        st.comments.push(json!({
            "_id": id,
            "user": { "_id": user, "firstName": "Ana" },
            "movie": movie,
            "content": content,
        }));
        id
    }
}

fn movie(id: &str, title: &str, genre: &str, published_at: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "genre": genre,
        "duration": 120,
        "description": format!("{title} description"),
        "published_at": published_at,
        "image": { "url": format!("https://img.example/{id}.jpg") },
    })
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/movies", get(list_movies))
        .route("/api/movies/:id", get(get_movie))
        .route("/api/favorites/user/:id", get(user_favorites))
        .route("/api/favorites", post(add_favorite).delete(remove_favorite))
        .route("/api/rates", get(list_rates).post(add_rate))
        .route("/api/rates/:movie", axum::routing::delete(remove_rate))
        .route("/api/comments", get(list_comments).post(add_comment))
        .route("/api/comments/:id", put(update_comment).delete(delete_comment))
        .with_state(state)
}

fn record(st: &mut ServiceState, method: Method, path: String, headers: &HeaderMap, body: &Value) {
    st.requests.push(Recorded {
        method,
        path,
        token: headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// Resolve the caller of an authenticated mutation, or the response refusing it.
fn authorize(st: &mut ServiceState, headers: &HeaderMap) -> Result<UserRecord, Response> {
    let user = st
        .user_for(headers)
        .ok_or_else(|| reply(StatusCode::UNAUTHORIZED, json!({ "message": "No token provided" })))?;
    if let Some((status, message)) = st.reject_next.take() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::FORBIDDEN);
        return Err(reply(status, json!({ "message": message })));
    }
    Ok(user)
}

fn auth_body(user: &UserRecord) -> Value {
    json!({
        "token": user.token(),
        "userId": user.id,
        "role": user.role,
        "accountStatus": user.status,
    })
}

// ============================================================================
// Auth
// ============================================================================

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::POST, "/auth/login".into(), &headers, &body);

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match st.users.iter().find(|u| u.email == email && u.password == password) {
        Some(user) => reply(StatusCode::OK, auth_body(user)),
        None => reply(StatusCode::UNAUTHORIZED, json!({ "message": "Invalid credentials" })),
    }
}

async fn register(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::POST, "/auth/register".into(), &headers, &body);

    let email = body["email"].as_str().unwrap_or_default().to_string();
    if st.users.iter().any(|u| u.email == email) {
        return reply(StatusCode::CONFLICT, json!({ "message": "Email already registered" }));
    }
    let user = UserRecord {
        id: st.next_id("u"),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        role: "user".into(),
        status: "active".into(),
    };
    st.users.push(user.clone());
    reply(StatusCode::CREATED, auth_body(&user))
}

// ============================================================================
// Movies
// ============================================================================

async fn list_movies(State(state): State<Shared>) -> Response {
    let st = state.lock().unwrap();
    reply(StatusCode::OK, Value::Array(st.movies.clone()))
}

async fn get_movie(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let st = state.lock().unwrap();
    match st.movies.iter().find(|m| m["_id"] == id.as_str()) {
        Some(movie) => reply(StatusCode::OK, movie.clone()),
        None => reply(StatusCode::NOT_FOUND, json!({ "message": "Movie not found" })),
    }
}

// ============================================================================
// Favorites
// ============================================================================

async fn user_favorites(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(user): Path<String>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::GET, format!("/favorites/user/{user}"), &headers, &Value::Null);

    let listed: Vec<Value> = st
        .favorites
        .iter()
        .enumerate()
        .filter(|(_, (u, _))| *u == user)
        .map(|(i, (u, m))| {
            let movie = st
                .movies
                .iter()
                .find(|movie| movie["_id"] == m.as_str())
                .cloned()
                .unwrap_or_else(|| Value::String(m.clone()));
            json!({ "_id": format!("f{i}"), "user": u, "movie": movie })
        })
        .collect();

    if listed.is_empty() {
        reply(StatusCode::OK, json!({ "message": "No favorites yet" }))
    } else {
        reply(StatusCode::OK, Value::Array(listed))
    }
}

async fn add_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::POST, "/favorites".into(), &headers, &body);
    if let Err(refused) = authorize(&mut st, &headers) {
        return refused;
    }

    let pair = (
        body["user"].as_str().unwrap_or_default().to_string(),
        body["movie"].as_str().unwrap_or_default().to_string(),
    );
    if !st.favorites.contains(&pair) {
        st.favorites.push(pair);
    }
    reply(StatusCode::CREATED, json!({ "message": "Added to favorites" }))
}

async fn remove_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::DELETE, "/favorites".into(), &headers, &body);
    if let Err(refused) = authorize(&mut st, &headers) {
        return refused;
    }

    let user = body["user"].as_str().unwrap_or_default().to_string();
    let movie = body["movie"].as_str().unwrap_or_default().to_string();
    st.favorites.retain(|(u, m)| !(*u == user && *m == movie));
    reply(StatusCode::OK, json!({ "message": "Removed from favorites" }))
}

// ============================================================================
// Rates
// ============================================================================

async fn list_rates(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let (rates, delay) = {
        let mut st = state.lock().unwrap();
        record(&mut st, Method::GET, "/rates".into(), &headers, &Value::Null);
        (st.rates.clone(), st.delay_next_rates.take())
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    reply(StatusCode::OK, Value::Array(rates))
}

async fn add_rate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::POST, "/rates".into(), &headers, &body);
    if let Err(refused) = authorize(&mut st, &headers) {
        return refused;
    }

    let user = body["user"].clone();
    let movie = body["movie"].clone();
    st.rates
        .retain(|rate| !(rate["user"] == user && rate["movie"] == movie));
    let id = st.next_id("r");
    st.rates.push(json!({
        "_id": id,
        "user": user,
        "movie": movie,
        "ratingValue": body["ratingValue"],
    }));
    reply(StatusCode::CREATED, json!({ "message": "Rated" }))
}

async fn remove_rate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(movie): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::DELETE, format!("/rates/{movie}"), &headers, &body);
    if let Err(refused) = authorize(&mut st, &headers) {
        return refused;
    }

    let user = body["user"].clone();
    st.rates
        .retain(|rate| !(rate["user"] == user && rate["movie"] == movie.as_str()));
    reply(StatusCode::OK, json!({ "message": "Rating removed" }))
}

// ============================================================================
// Comments
// ============================================================================

async fn list_comments(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut st = state.lock().unwrap();
    let movie = query.get("movie").cloned().unwrap_or_default();
    record(&mut st, Method::GET, format!("/comments?movie={movie}"), &headers, &Value::Null);

    let listed: Vec<Value> = st
        .comments
        .iter()
        .filter(|c| c["movie"] == movie.as_str())
        .cloned()
        .collect();
    reply(StatusCode::OK, Value::Array(listed))
}

async fn add_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::POST, "/comments".into(), &headers, &body);
    let user = match authorize(&mut st, &headers) {
        Ok(user) => user,
        Err(refused) => return refused,
    };

    let id = st.next_id("c");
    st.comments.push(json!({
        "_id": id,
        "user": { "_id": user.id, "email": user.email },
        "movie": body["movie"],
        "content": body["content"],
    }));
    reply(StatusCode::CREATED, json!({ "_id": id }))
}

async fn update_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::PUT, format!("/comments/{id}"), &headers, &body);
    if let Err(refused) = authorize(&mut st, &headers) {
        return refused;
    }

    match st.comments.iter_mut().find(|c| c["_id"] == id.as_str()) {
        Some(comment) => {
            comment["content"] = body["content"].clone();
            reply(StatusCode::OK, comment.clone())
        }
        None => reply(StatusCode::NOT_FOUND, json!({ "message": "Comment not found" })),
    }
}

async fn delete_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    record(&mut st, Method::DELETE, format!("/comments/{id}"), &headers, &body);
    if let Err(refused) = authorize(&mut st, &headers) {
        return refused;
    }

    let before = st.comments.len();
    st.comments.retain(|c| c["_id"] != id.as_str());
    if st.comments.len() == before {
        reply(StatusCode::NOT_FOUND, json!({ "message": "Comment not found" }))
    } else {
        reply(StatusCode::OK, json!({ "message": "Comment deleted" }))
    }
}
