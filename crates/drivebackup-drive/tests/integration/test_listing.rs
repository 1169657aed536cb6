//! Integration tests for children listing
//!
//! Verifies the query parameters sent to `children.list` and the mapping
//! of `nextPageToken` to a continuation cursor.

use drivebackup_core::domain::newtypes::{ContainerId, PageCursor};
use drivebackup_core::ports::IRemoteCatalog;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

const FILE_FILTER: &str =
    "mimeType != 'application/vnd.google-apps.folder' and trashed != true";

#[tokio::test]
async fn test_list_children_sends_query_and_token() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/root/children"))
        .and(query_param("q", FILE_FILTER))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::child_list_json(&["a", "b"], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = catalog
        .list_children(&ContainerId::root(), FILE_FILTER, None)
        .await
        .expect("listing failed");

    let ids: Vec<_> = page.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn test_list_children_follows_cursor() {
    let (server, catalog) = common::setup_drive_mock().await;
    common::mount_children_two_pages(&server, "folder-1", &["a", "b"], &["c", "d"]).await;

    let container = ContainerId::new("folder-1".to_string()).unwrap();

    let first = catalog
        .list_children(&container, FILE_FILTER, None)
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    let cursor = first.next_cursor.expect("first page should carry a cursor");
    assert_eq!(cursor.as_str(), "t1");

    let second = catalog
        .list_children(&container, FILE_FILTER, Some(&cursor))
        .await
        .unwrap();
    let ids: Vec<_> = second.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "d"]);
    // An empty nextPageToken ends pagination
    assert!(second.next_cursor.is_none());
}

#[tokio::test]
async fn test_list_children_empty_folder() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/root/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "drive#childList"
        })))
        .mount(&server)
        .await;

    let page = catalog
        .list_children(&ContainerId::root(), FILE_FILTER, None)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.next_cursor, PageCursor::from_token(None));
}
