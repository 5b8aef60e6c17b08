//! Wire-level behavior of `ApiClient` on its own.

use reelsync::api::ApiClient;
use reelsync::sync::{FavoriteSync, RemoteSyncClient, SyncOutcome};
use reelsync::{ApiError, Session};

use crate::support::movie_service::MovieService;

#[tokio::test]
async fn unauthenticated_calls_carry_no_token() {
    let service = MovieService::start().await;
    let api = service.api();

    api.rates(None).await.unwrap();
    api.comments("m1", None).await.unwrap();

    assert!(service.requests().iter().all(|r| r.token.is_none()));
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let service = MovieService::start().await;
    let api = service.api();

    let err = api
        .add_favorite(&Session::new("forged", "u1"), "m1")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "No token provided");
}

#[tokio::test]
async fn favorite_sync_classifies_outcomes() {
    let service = MovieService::start().await;
    let user = service.add_user("u1", "ana@example.com", "hunter22", "active");
    let session = Session::new(user.token(), "u1");
    let sync = FavoriteSync::new(service.api(), session.clone());

    assert_eq!(sync.confirm("m1", &true).await, SyncOutcome::Ack);

    service.reject_next(409, "Already a favorite");
    assert_eq!(
        sync.confirm("m1", &true).await,
        SyncOutcome::Rejected("Already a favorite".into())
    );

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);
    let offline = FavoriteSync::new(
        ApiClient::with_http(reqwest::Client::new(), &format!("http://{addr}/api")),
        session,
    );
    assert!(matches!(
        offline.confirm("m1", &false).await,
        SyncOutcome::Unreachable(_)
    ));
}

#[tokio::test]
async fn trailing_slash_is_trimmed() {
    let service = MovieService::start().await;
    let api = ApiClient::with_http(reqwest::Client::new(), &format!("{}/", service.base_url()));

    assert_eq!(api.base_url(), service.base_url());
    assert_eq!(api.movies().await.unwrap().len(), 3);
    assert!(matches!(
        api.movie("missing").await,
        Err(ApiError::Rejected { status: 404, .. })
    ));
}
