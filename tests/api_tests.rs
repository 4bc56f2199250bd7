mod common;

use bytes::Bytes;
use notify_client::models::{LoginRequest, Photo, RegisterRequest};
use notify_client::NotifyError;
use reqwest::StatusCode;
use tokio_test::{assert_err, assert_ok};

use common::{ADMIN_TOKEN, COVER_BYTES, PASSWORD, USER_TOKEN};

#[tokio::test]
async fn test_search_encodes_query_as_one_segment() {
    let backend = common::start().await;

    let albums = assert_ok!(backend.api.search_albums("AC/DC live?").await);
    assert_eq!(albums.len(), 2);
    assert_eq!(albums[0].title, "AC/DC live? Vol. 1");
    assert_eq!(albums[1].cover_url, "");

    let paths = backend.stub.requested_paths.lock().unwrap().clone();
    assert_eq!(paths, vec!["AC/DC live?".to_string()]);
}

#[tokio::test]
async fn test_get_album_decodes_counts() {
    let backend = common::start().await;

    let album = assert_ok!(backend.api.get_album("Daft Punk", "Discovery").await);
    assert_eq!(album.artist, "Daft Punk");
    assert_eq!(album.title, "Discovery");
    assert_eq!(album.play_count, 51234567);
    assert_eq!(album.track_count, 14);
}

#[tokio::test]
async fn test_status_error_keeps_body() {
    let backend = common::start().await;

    let err = assert_err!(backend.api.get_album("missing", "x").await);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.body().unwrap()["detail"], "Not found.");

    let err = assert_err!(backend.api.search_albums("boom").await);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.body(), Some(&serde_json::json!("Traceback...")));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let api = common::unreachable_api();
    let err = assert_err!(api.search_albums("anything").await);
    assert!(matches!(err, NotifyError::Unreachable(_)));
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn test_login_round_trip() {
    let backend = common::start().await;

    let ok = assert_ok!(
        backend
            .api
            .login(&LoginRequest {
                username: "admin".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
    );
    assert_eq!(ok.token, ADMIN_TOKEN);
    assert!(ok.user().is_admin());

    let err = assert_err!(
        backend
            .api
            .login(&LoginRequest {
                username: "admin".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
    );
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_register_sends_only_present_fields() {
    let backend = common::start().await;

    let request = RegisterRequest {
        username: "ana".to_string(),
        password: "password1".to_string(),
        bio: Some("hola".to_string()),
        photo: Some(Photo {
            file_name: "me.png".to_string(),
            mime_type: "image/png".to_string(),
            data: Bytes::from_static(b"png-bytes"),
        }),
        notify_by_email: Some(false),
        ..Default::default()
    };

    let resp = assert_ok!(backend.api.register(&request).await);
    assert_eq!(resp.id, 42);
    assert_eq!(resp.token, "new-token");

    let stub = &backend.stub;
    assert_eq!(stub.field("bio").unwrap().data, b"hola");
    assert_eq!(stub.field("notifPorEmail").unwrap().data, b"false");
    assert!(stub.field("email").is_none());
    assert!(stub.field("is_staff").is_none());

    let photo = stub.field("foto").unwrap();
    assert_eq!(photo.file_name.as_deref(), Some("me.png"));
    assert_eq!(photo.content_type.as_deref(), Some("image/png"));
    assert_eq!(photo.data, b"png-bytes");
}

#[tokio::test]
async fn test_monitoring_requires_admin_token() {
    let backend = common::start().await;

    let metrics = assert_ok!(backend.api.monitoring_dashboard(ADMIN_TOKEN, 6).await);
    assert_eq!(metrics.time_range_hours, 6);
    assert_eq!(metrics.status_distribution.len(), 2);

    let err = assert_err!(backend.api.monitoring_dashboard(USER_TOKEN, 6).await);
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    let err = assert_err!(backend.api.monitoring_logs("stale").await);
    assert!(err.is_auth_failure());

    let logs = assert_ok!(backend.api.monitoring_logs(ADMIN_TOKEN).await);
    assert_eq!(logs.len(), 2);
}

#[tokio::test]
async fn test_download_cover_streams_to_file() {
    let backend = common::start().await;
    let dest = backend.dir.path().join("covers").join("discovery.png");

    let url = format!("{}/covers/discovery.png", backend.root);
    let written = assert_ok!(backend.api.download_cover(&url, &dest).await);
    assert_eq!(written, COVER_BYTES.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), COVER_BYTES);

    let missing = format!("{}/covers/none.png", backend.root);
    let err = assert_err!(backend.api.download_cover(&missing, &dest).await);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_broken_cover_download_leaves_no_file() {
    let backend = common::start().await;
    let dest = backend.dir.path().join("broken.png");

    let url = format!("{}/covers/broken.png", backend.root);
    assert_err!(backend.api.download_cover(&url, &dest).await);
    assert!(!dest.exists());
    assert!(!backend.dir.path().join("broken.png.part").exists());
}

#[tokio::test]
async fn test_unreadable_error_body_is_dropped() {
    let backend = common::start().await;
    let dest = backend.dir.path().join("never.png");

    let url = format!("{}/covers/broken-error.png", backend.root);
    let err = assert_err!(backend.api.download_cover(&url, &dest).await);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.body().is_none());
}
