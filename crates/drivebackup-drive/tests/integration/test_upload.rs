//! Integration tests for multipart uploads

use std::io::Write;

use drivebackup_core::domain::newtypes::ContainerId;
use drivebackup_core::ports::{IRemoteCatalog, NewRemoteFile};
use wiremock::matchers::{body_string_contains, header_regex, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_insert_file_multipart() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .and(query_param("uploadType", "multipart"))
        .and(header_regex("content-type", "^multipart/related; boundary=drivebackup_"))
        .and(body_string_contains(r#""title":"hello.txt""#))
        .and(body_string_contains(r#""parents":[{"id":"folder-9"}]"#))
        .and(body_string_contains("hello drive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_json(
            "uploaded-1",
            "hello.txt",
            "5d41402abc4b2a76b9719d911017c592",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut source = tempfile::NamedTempFile::new().unwrap();
    source.write_all(b"hello drive").unwrap();
    source.flush().unwrap();

    let metadata = NewRemoteFile::file(
        "hello.txt",
        ContainerId::new("folder-9".to_string()).unwrap(),
    );
    let item = catalog
        .insert_file(&metadata, source.path())
        .await
        .expect("upload failed");

    assert_eq!(item.id, "uploaded-1");
    assert_eq!(item.title, "hello.txt");
}

#[tokio::test]
async fn test_insert_file_empty_content() {
    let (server, catalog) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_json(
            "empty-1",
            "empty.bin",
            "d41d8cd98f00b204e9800998ecf8427e",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let source = tempfile::NamedTempFile::new().unwrap();
    let metadata = NewRemoteFile::file("empty.bin", ContainerId::root());
    let item = catalog.insert_file(&metadata, source.path()).await.unwrap();
    assert_eq!(
        item.md5_checksum.as_deref(),
        Some("d41d8cd98f00b204e9800998ecf8427e")
    );
}

#[tokio::test]
async fn test_insert_file_streams_multi_chunk_content() {
    let (server, catalog) = common::setup_drive_mock().await;

    // Larger than one read chunk, so the media part arrives in pieces
    let mut content = vec![b'x'; 256 * 1024];
    content.extend_from_slice(b"END-OF-CONTENT");

    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .and(body_string_contains(r#""title":"big.bin""#))
        .and(body_string_contains("END-OF-CONTENT\r\n--drivebackup_"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_json(
            "big-1",
            "big.bin",
            "00000000000000000000000000000000",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut source = tempfile::NamedTempFile::new().unwrap();
    source.write_all(&content).unwrap();
    source.flush().unwrap();

    let metadata = NewRemoteFile::file("big.bin", ContainerId::root());
    let item = catalog.insert_file(&metadata, source.path()).await.unwrap();
    assert_eq!(item.id, "big-1");

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/upload/files")
        .unwrap();
    let declared: usize = upload
        .headers
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap();
    assert_eq!(declared, upload.body.len());
    assert!(upload.body.len() > content.len());
}
