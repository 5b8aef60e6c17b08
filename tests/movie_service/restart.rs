use reelsync::{FileStore, MovieClient};

use crate::support::init_logging;
use crate::support::movie_service::MovieService;

#[tokio::test]
async fn session_and_flags_survive_a_restart() {
    init_logging();
    let service = MovieService::start().await;
    service.add_user("u1", "ana@example.com", "hunter22", "active");
    let dir = tempfile::tempdir().unwrap();
    let config = service
        .config()
        .with_storage_path(dir.path().join("reelsync.json"));

    {
        let client: MovieClient<FileStore> = MovieClient::open(config.clone()).unwrap();
        let session = client
            .auth()
            .login("ana@example.com", "hunter22")
            .await
            .unwrap();
        client.favorites(&session).toggle("m2").await.unwrap();
    }

    let client = MovieClient::open(config).unwrap();
    let session = client.auth().restore().unwrap().unwrap();
    assert_eq!(session.user_id(), "u1");
    assert!(client.favorites(&session).is_favorite("m2"));
    assert!(!client.favorites(&session).is_favorite("m1"));
}
