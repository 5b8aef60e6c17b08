use reelsync::api::RegisterForm;
use reelsync::session::{AUTH_TOKEN_KEY, USER_EMAIL_KEY, USER_ID_KEY, USER_ROLE_KEY};
use reelsync::{
    ApiError, AuthError, AuthService, InMemoryStore, KeyValueStore, Notification, Notifier,
};

use crate::support::init_logging;
use crate::support::movie_service::MovieService;

const SESSION_KEYS: [&str; 4] = [AUTH_TOKEN_KEY, USER_ID_KEY, USER_ROLE_KEY, USER_EMAIL_KEY];

fn auth(service: &MovieService, store: &InMemoryStore, notifier: &Notifier) -> AuthService<InMemoryStore> {
    init_logging();
    AuthService::new(service.api(), store.clone(), notifier.clone())
}

#[tokio::test]
async fn login_persists_every_session_field() {
    let service = MovieService::start().await;
    service.add_user("u1", "ana@example.com", "hunter22", "active");
    let store = InMemoryStore::new();
    let auth = auth(&service, &store, &Notifier::new());

    let session = auth.login("ana@example.com", "hunter22").await.unwrap();

    assert_eq!(session.user_id(), "u1");
    assert_eq!(session.token(), "token-u1");
    assert_eq!(store.get_item(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("token-u1"));
    assert_eq!(store.get_item(USER_ID_KEY).unwrap().as_deref(), Some("u1"));
    assert_eq!(store.get_item(USER_ROLE_KEY).unwrap().as_deref(), Some("user"));
    assert_eq!(
        store.get_item(USER_EMAIL_KEY).unwrap().as_deref(),
        Some("ana@example.com")
    );
    assert_eq!(auth.restore().unwrap(), Some(session));
}

#[tokio::test]
async fn banned_login_writes_nothing_and_notifies() {
    let service = MovieService::start().await;
    service.add_user("u2", "bob@example.com", "hunter22", "banned");
    let store = InMemoryStore::new();
    let notifier = Notifier::new();
    let mut notifications = notifier.subscribe();
    let auth = auth(&service, &store, &notifier);

    let err = auth.login("bob@example.com", "hunter22").await.unwrap_err();

    assert_eq!(err, AuthError::Banned);
    assert!(store.is_empty());
    for key in SESSION_KEYS {
        assert_eq!(store.get_item(key).unwrap(), None);
    }
    assert_eq!(
        notifications.recv().await.unwrap(),
        Notification::AccountBanned {
            email: "bob@example.com".into()
        }
    );
}

#[tokio::test]
async fn wrong_password_is_a_rejection() {
    let service = MovieService::start().await;
    service.add_user("u1", "ana@example.com", "hunter22", "active");
    let store = InMemoryStore::new();
    let auth = auth(&service, &store, &Notifier::new());

    let err = auth.login("ana@example.com", "wrong!").await.unwrap_err();

    assert_eq!(
        err,
        AuthError::Api(ApiError::Rejected {
            status: 401,
            message: "Invalid credentials".into()
        })
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn invalid_login_never_reaches_the_service() {
    let service = MovieService::start().await;
    let store = InMemoryStore::new();
    let auth = auth(&service, &store, &Notifier::new());

    let err = auth.login("", "").await.unwrap_err();

    assert!(matches!(err, AuthError::Validation(_)));
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn register_logs_straight_in() {
    let service = MovieService::start().await;
    let store = InMemoryStore::new();
    let auth = auth(&service, &store, &Notifier::new());

    let form = RegisterForm {
        first_name: "Ana".into(),
        last_name: "Silva".into(),
        email: " ana@example.com ".into(),
        password: "hunter22".into(),
        phone: "900000000".into(),
        address: "Rua Augusta 1".into(),
    };
    let session = auth.register(&form).await.unwrap();

    assert_eq!(session.email(), Some("ana@example.com"));
    assert_eq!(auth.restore().unwrap(), Some(session));

    let sent = &service.requests()[0];
    assert_eq!(sent.path, "/auth/register");
    assert_eq!(sent.body["firstName"], "Ana");
    assert_eq!(sent.body["email"], "ana@example.com");
}

#[tokio::test]
async fn logout_removes_every_session_field() {
    let service = MovieService::start().await;
    service.add_user("u1", "ana@example.com", "hunter22", "active");
    let store = InMemoryStore::new();
    store.set_item("cachedFavorites", r#"{"m1":true}"#).unwrap();
    let auth = auth(&service, &store, &Notifier::new());
    auth.login("ana@example.com", "hunter22").await.unwrap();

    auth.logout().unwrap();

    for key in SESSION_KEYS {
        assert_eq!(store.get_item(key).unwrap(), None);
    }
    assert_eq!(auth.restore().unwrap(), None);
    // Cached flags outlive the session.
    assert!(store.get_item("cachedFavorites").unwrap().is_some());
}
