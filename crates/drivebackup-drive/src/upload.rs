//! Upload operations for Google Drive v2
//!
//! Files are created with a single multipart request
//! (`POST /upload/drive/v2/files?uploadType=multipart`) whose body is a
//! `multipart/related` document: a JSON metadata part followed by the
//! file content.
//!
//! The file is never loaded into memory. The body is streamed as
//! preamble, file content and epilogue, with `Content-Length` computed
//! up front from the file size.
//!
//! ## Drive API References
//!
//! - [Files: insert](https://developers.google.com/drive/api/v2/reference/files/insert)
//! - [Multipart upload](https://developers.google.com/drive/api/guides/manage-uploads#multipart)

use std::io::Cursor;
use std::path::Path;

use drivebackup_core::ports::{NewRemoteFile, RemoteError, RemoteItem};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Method;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::client::DriveClient;
use crate::files::{DriveFile, FileMetadata, ParentRef};

/// Content type of the media part when the caller supplies none
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Length of the random part of a multipart boundary
const BOUNDARY_LEN: usize = 30;

// ============================================================================
// Multipart body construction
// ============================================================================

/// Generates a random multipart boundary
fn new_boundary() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_LEN)
        .map(char::from)
        .collect();
    format!("drivebackup_{suffix}")
}

/// Everything before the media bytes: the JSON part and the media part headers
///
/// # Arguments
/// * `boundary` - Boundary string, without the leading dashes
/// * `metadata_json` - Serialized file metadata
/// * `media_type` - Content type of the media part
pub fn multipart_preamble(boundary: &str, metadata_json: &str, media_type: &str) -> Vec<u8> {
    let mut head = Vec::with_capacity(metadata_json.len() + 160);
    head.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    head.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    head.extend_from_slice(metadata_json.as_bytes());
    head.extend_from_slice(b"\r\n");
    head.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    head.extend_from_slice(format!("Content-Type: {media_type}\r\n\r\n").as_bytes());
    head
}

/// Everything after the media bytes
pub fn multipart_epilogue(boundary: &str) -> Vec<u8> {
    format!("\r\n--{boundary}--\r\n").into_bytes()
}

/// Opens `source` as a streaming multipart body
///
/// # Returns
/// The body reader and its exact length in bytes
pub async fn open_multipart_body(
    boundary: &str,
    metadata_json: &str,
    media_type: &str,
    source: &Path,
) -> std::io::Result<(impl AsyncRead + Send + Sync + Unpin + 'static, u64)> {
    let file = tokio::fs::File::open(source).await?;
    let file_len = file.metadata().await?.len();

    let head = multipart_preamble(boundary, metadata_json, media_type);
    let tail = multipart_epilogue(boundary);
    let total = head.len() as u64 + file_len + tail.len() as u64;

    // `take` pins the media part to the length announced in Content-Length
    let reader = Cursor::new(head)
        .chain(file.take(file_len))
        .chain(Cursor::new(tail));
    Ok((reader, total))
}

// ============================================================================
// insert_multipart
// ============================================================================

/// Creates a file from the content at `source`
///
/// An unopenable source fails with [`RemoteError::LocalIo`] without
/// contacting the server.
///
/// # Returns
/// The metadata of the created file as reported by Drive
pub async fn insert_multipart(
    client: &DriveClient,
    metadata: &NewRemoteFile,
    source: &Path,
) -> Result<RemoteItem, RemoteError> {
    let wire = FileMetadata {
        title: &metadata.title,
        mime_type: metadata.mime_type.as_deref(),
        parents: metadata
            .parent
            .iter()
            .map(|p| ParentRef {
                id: p.as_str().to_string(),
            })
            .collect(),
    };
    let metadata_json =
        serde_json::to_string(&wire).map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

    let boundary = new_boundary();
    let media_type = metadata.mime_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE);
    let (reader, content_length) =
        open_multipart_body(&boundary, &metadata_json, media_type, source)
            .await
            .map_err(|e| RemoteError::LocalIo(format!("{}: {e}", source.display())))?;

    debug!(
        title = %metadata.title,
        bytes = content_length,
        "Uploading file (multipart)"
    );

    let file: DriveFile = client
        .get_json(
            client
                .upload_request(Method::POST, "/files")
                .query(&[("uploadType", "multipart")])
                .header(
                    reqwest::header::CONTENT_TYPE,
                    format!("multipart/related; boundary={boundary}"),
                )
                .header(reqwest::header::CONTENT_LENGTH, content_length)
                .body(reqwest::Body::wrap_stream(ReaderStream::new(reader))),
        )
        .await?;

    let item = RemoteItem::from(file);
    debug!(id = %item.id, title = %item.title, "Multipart upload completed");
    Ok(item)
}
