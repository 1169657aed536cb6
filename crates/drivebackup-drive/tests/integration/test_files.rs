//! Integration tests for file and folder metadata operations

use drivebackup_core::domain::newtypes::{ContainerId, RemoteId};
use drivebackup_core::ports::IRemoteCatalog;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_get_file_maps_metadata() {
    let (server, catalog) = common::setup_drive_mock().await;
    common::mount_get_file(
        &server,
        "file-001",
        common::file_json("file-001", "notes.txt", "0CC175B9C0F1B6A831C399E269772661"),
    )
    .await;

    let item = catalog
        .get_file(&RemoteId::new("file-001".to_string()).unwrap())
        .await
        .expect("get_file failed");

    assert_eq!(item.id, "file-001");
    assert_eq!(item.title, "notes.txt");
    assert_eq!(
        item.md5_checksum.as_deref(),
        Some("0cc175b9c0f1b6a831c399e269772661")
    );
    assert_eq!(item.parent_ids, vec!["root".to_string()]);
    assert!(!item.is_folder());
}

#[tokio::test]
async fn test_get_file_invalid_json_is_invalid_response() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = catalog
        .get_file(&RemoteId::new("broken".to_string()).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        drivebackup_core::ports::RemoteError::InvalidResponse(_)
    ));
}

#[tokio::test]
async fn test_find_folders_sends_title_query() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param(
            "q",
            "mimeType = 'application/vnd.google-apps.folder' and title = 'Backups' and trashed != true",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "drive#fileList",
            "items": [common::folder_json("folder-1", "Backups"), common::folder_json("folder-2", "Backups")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let folders = catalog.find_folders("Backups").await.unwrap();
    assert_eq!(folders.len(), 2);
    assert!(folders.iter().all(|f| f.is_folder()));
    assert_eq!(folders[0].id, "folder-1");
}

#[tokio::test]
async fn test_find_folders_none() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})),
        )
        .mount(&server)
        .await;

    assert!(catalog.find_folders("Missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_folder_posts_metadata() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_json(serde_json::json!({
            "title": "Backups",
            "mimeType": "application/vnd.google-apps.folder",
            "parents": [{"id": "root"}]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::folder_json("new-folder", "Backups")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let folder = catalog
        .create_folder("Backups", &ContainerId::root())
        .await
        .unwrap();
    assert_eq!(folder.id, "new-folder");
    assert!(folder.is_folder());
}
