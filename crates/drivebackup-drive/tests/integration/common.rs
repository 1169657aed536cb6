//! Shared test helpers for Drive API integration tests
//!
//! Provides wiremock-based mock server setup for Drive v2 endpoints.
//! Each helper mounts the necessary mock endpoints; [`setup_drive_mock`]
//! returns a DriveCatalog pointing at the mock server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drivebackup_drive::{DriveCatalog, DriveClient};

pub const TEST_TOKEN: &str = "test-access-token";

/// Starts a mock server and returns a (MockServer, DriveCatalog) tuple.
///
/// Metadata requests go to the server root, uploads to `/upload`.
pub async fn setup_drive_mock() -> (MockServer, DriveCatalog) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_urls(
        TEST_TOKEN,
        server.uri(),
        format!("{}/upload", server.uri()),
    );
    (server, DriveCatalog::new(client))
}

/// JSON for a Drive `File` resource with a checksum.
pub fn file_json(id: &str, title: &str, md5: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "drive#file",
        "id": id,
        "title": title,
        "mimeType": "application/octet-stream",
        "md5Checksum": md5,
        "parents": [{"kind": "drive#parentReference", "id": "root", "isRoot": true}],
        "labels": {"trashed": false}
    })
}

/// JSON for a Drive folder resource.
pub fn folder_json(id: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "drive#file",
        "id": id,
        "title": title,
        "mimeType": "application/vnd.google-apps.folder",
        "parents": [{"id": "root"}],
        "labels": {"trashed": false}
    })
}

/// JSON for a `children.list` page.
pub fn child_list_json(ids: &[&str], next_page_token: Option<&str>) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({"kind": "drive#childReference", "id": id}))
        .collect();
    let mut body = serde_json::json!({"kind": "drive#childList", "items": items});
    if let Some(token) = next_page_token {
        body["nextPageToken"] = serde_json::Value::String(token.to_string());
    }
    body
}

/// Mounts `GET /files/{id}` returning `body`.
pub async fn mount_get_file(server: &MockServer, id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a two-page children listing for `container`.
///
/// The page requested with `pageToken=t1` is registered first so it wins
/// over the catch-all first page.
pub async fn mount_children_two_pages(
    server: &MockServer,
    container: &str,
    page1: &[&str],
    page2: &[&str],
) {
    let children_path = format!("/files/{container}/children");

    Mock::given(method("GET"))
        .and(path(children_path.clone()))
        .and(query_param("pageToken", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(child_list_json(page2, Some(""))))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(children_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(child_list_json(page1, Some("t1"))))
        .expect(1)
        .mount(server)
        .await;
}

/// Google API error envelope with a single reason.
pub fn error_json(code: u16, reason: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "errors": [{"domain": "usageLimits", "reason": reason, "message": message}],
            "code": code,
            "message": message
        }
    })
}
