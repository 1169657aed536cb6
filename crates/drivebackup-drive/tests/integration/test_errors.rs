//! Integration tests for error mapping
//!
//! Every non-success status must surface as `RemoteError::Api` with the
//! decoded reason, so callers can tell rate limiting apart from other
//! rejections.

use drivebackup_core::domain::newtypes::{ContainerId, RemoteId};
use drivebackup_core::ports::{IRemoteCatalog, RemoteError};
use drivebackup_drive::{DriveCatalog, DriveClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_rate_limit_response_keeps_reason() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/root/children"))
        .respond_with(ResponseTemplate::new(403).set_body_json(common::error_json(
            403,
            "rateLimitExceeded",
            "Rate Limit Exceeded",
        )))
        .mount(&server)
        .await;

    let err = catalog
        .list_children(&ContainerId::root(), "trashed != true", None)
        .await
        .unwrap_err();

    match err {
        RemoteError::Api {
            code,
            message,
            reason,
            body,
        } => {
            assert_eq!(code, 403);
            assert_eq!(message, "Rate Limit Exceeded");
            assert_eq!(reason.as_deref(), Some("rateLimitExceeded"));
            assert!(body.unwrap().contains("usageLimits"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_error_maps_to_401() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/abc"))
        .respond_with(ResponseTemplate::new(401).set_body_json(common::error_json(
            401,
            "authError",
            "Invalid Credentials",
        )))
        .mount(&server)
        .await;

    let err = catalog
        .get_file(&RemoteId::new("abc".to_string()).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert!(matches!(err, RemoteError::Api { reason: Some(ref r), .. } if r == "authError"));
}

#[tokio::test]
async fn test_not_found_without_body() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = catalog
        .get_file(&RemoteId::new("missing".to_string()).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err, RemoteError::api(404, "Not Found"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Port 9 (discard) is not expected to accept HTTP connections
    let client = DriveClient::with_base_urls("t", "http://127.0.0.1:9", "http://127.0.0.1:9");
    let catalog = DriveCatalog::new(client);

    let err = catalog.find_folders("x").await.unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)));
}
