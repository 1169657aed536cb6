//! Metadata operations of the Drive v2 `files` and `children` collections
//!
//! - [`list_children`] - One page of `GET /files/{folderId}/children`
//! - [`get_file`] - `GET /files/{fileId}`
//! - [`find_folders`] - `GET /files?q=...` restricted to folders with a title
//! - [`create_folder`] - `POST /files` with the folder MIME type
//!
//! ## Drive API References
//!
//! - [Children: list](https://developers.google.com/drive/api/v2/reference/children/list)
//! - [Files: get](https://developers.google.com/drive/api/v2/reference/files/get)
//! - [Search query terms](https://developers.google.com/drive/api/v2/ref-search-terms)

use drivebackup_core::domain::newtypes::{ContainerId, PageCursor, RemoteId};
use drivebackup_core::ports::{ChildPage, ChildReference, RemoteError, RemoteItem, FOLDER_MIME_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::DriveClient;

// ============================================================================
// Drive API wire types
// ============================================================================

/// A `File` resource as returned by Drive v2
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriveFile {
    id: String,
    #[serde(default)]
    title: String,
    md5_checksum: Option<String>,
    mime_type: Option<String>,
    #[serde(default)]
    parents: Vec<ParentRef>,
    labels: Option<Labels>,
}

/// Parent reference inside a `File` resource
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ParentRef {
    pub(crate) id: String,
}

/// Label flags of a `File` resource
#[derive(Debug, Deserialize)]
struct Labels {
    #[serde(default)]
    trashed: bool,
}

/// Response of `children.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildList {
    #[serde(default)]
    items: Vec<ChildReference>,
    next_page_token: Option<String>,
}

/// Response of `files.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    items: Vec<DriveFile>,
}

/// Request body for creating a file or folder
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileMetadata<'a> {
    pub(crate) title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) parents: Vec<ParentRef>,
}

impl From<DriveFile> for RemoteItem {
    fn from(file: DriveFile) -> Self {
        RemoteItem {
            id: file.id,
            title: file.title,
            md5_checksum: file.md5_checksum.map(|h| h.to_ascii_lowercase()),
            mime_type: file.mime_type,
            parent_ids: file.parents.into_iter().map(|p| p.id).collect(),
            trashed: file.labels.map(|l| l.trashed).unwrap_or(false),
        }
    }
}

/// Quotes a string literal for a Drive search query
pub fn quote_query_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Search query matching non-trashed folders titled `title`
pub fn folder_query(title: &str) -> String {
    format!(
        "mimeType = '{FOLDER_MIME_TYPE}' and title = {} and trashed != true",
        quote_query_value(title)
    )
}

// ============================================================================
// Operations
// ============================================================================

/// Lists one page of the children of `container` matching `query`
pub async fn list_children(
    client: &DriveClient,
    container: &ContainerId,
    query: &str,
    cursor: Option<&PageCursor>,
) -> Result<ChildPage, RemoteError> {
    let path = format!("/files/{}/children", container.as_str());
    let mut params: Vec<(&str, &str)> = vec![("q", query)];
    if let Some(cursor) = cursor {
        params.push(("pageToken", cursor.as_str()));
    }

    debug!(container = %container, has_cursor = cursor.is_some(), "Listing children");
    let list: ChildList = client
        .get_json(client.request(Method::GET, &path).query(&params))
        .await?;

    Ok(ChildPage {
        items: list.items,
        next_cursor: PageCursor::from_token(list.next_page_token),
    })
}

/// Retrieves the full metadata of a single file
pub async fn get_file(client: &DriveClient, id: &RemoteId) -> Result<RemoteItem, RemoteError> {
    let path = format!("/files/{}", id.as_str());
    debug!(id = %id, "Fetching file metadata");
    let file: DriveFile = client.get_json(client.request(Method::GET, &path)).await?;
    Ok(file.into())
}

/// Returns every non-trashed folder titled `title`
pub async fn find_folders(
    client: &DriveClient,
    title: &str,
) -> Result<Vec<RemoteItem>, RemoteError> {
    let query = folder_query(title);
    debug!(title, "Looking up folder by title");
    let list: FileList = client
        .get_json(client.request(Method::GET, "/files").query(&[("q", query.as_str())]))
        .await?;
    Ok(list.items.into_iter().map(RemoteItem::from).collect())
}

/// Creates a folder titled `title` under `parent`
pub async fn create_folder(
    client: &DriveClient,
    title: &str,
    parent: &ContainerId,
) -> Result<RemoteItem, RemoteError> {
    let body = FileMetadata {
        title,
        mime_type: Some(FOLDER_MIME_TYPE),
        parents: vec![ParentRef {
            id: parent.as_str().to_string(),
        }],
    };
    debug!(title, parent = %parent, "Creating folder");
    let file: DriveFile = client
        .get_json(client.request(Method::POST, "/files").json(&body))
        .await?;
    Ok(file.into())
}
