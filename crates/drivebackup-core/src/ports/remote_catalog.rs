//! Remote catalog port (driven/secondary port)
//!
//! This module defines the interface the backup engine uses to talk to the
//! remote object store. The implementation in `drivebackup-drive` targets
//! the Google Drive v2 REST API.
//!
//! ## Design Notes
//!
//! - Methods return the typed [`RemoteError`] rather than `anyhow::Error`
//!   so the retry layer can inspect the HTTP status and failure reason.
//! - [`RemoteItem`] and [`ChildPage`] are port-level DTOs; the sync crate
//!   maps them to domain records.
//! - Every call is a single request. Retrying is the caller's concern.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::newtypes::{ContainerId, PageCursor, RemoteId};

/// MIME type Drive assigns to folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

// ============================================================================
// RemoteError
// ============================================================================

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The API answered with a non-success status
    ///
    /// `reason` is the first entry of `error.errors[].reason` when the
    /// adapter could decode it; `body` keeps the raw response text.
    #[error("API error {code}: {message}")]
    Api {
        code: u16,
        message: String,
        reason: Option<String>,
        body: Option<String>,
    },

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// A success response that could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The local source file of an insert could not be read
    #[error("Local source unreadable: {0}")]
    LocalIo(String),
}

impl RemoteError {
    /// Shorthand for an API error without reason or body
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
            reason: None,
            body: None,
        }
    }

    /// Attaches a decoded failure reason to an API error
    #[must_use]
    pub fn with_reason(self, reason: impl Into<String>) -> Self {
        match self {
            Self::Api {
                code,
                message,
                body,
                ..
            } => Self::Api {
                code,
                message,
                reason: Some(reason.into()),
                body,
            },
            other => other,
        }
    }

    /// Attaches the raw response body to an API error
    #[must_use]
    pub fn with_body(self, body: impl Into<String>) -> Self {
        match self {
            Self::Api {
                code,
                message,
                reason,
                ..
            } => Self::Api {
                code,
                message,
                reason,
                body: Some(body.into()),
            },
            other => other,
        }
    }

    /// HTTP status of an API error
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// ============================================================================
// Port DTOs
// ============================================================================

/// Metadata of a single item as reported by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: String,
    pub title: String,
    /// Lowercase hex MD5 of the content (absent for native documents and folders)
    pub md5_checksum: Option<String>,
    pub mime_type: Option<String>,
    pub parent_ids: Vec<String>,
    pub trashed: bool,
}

impl RemoteItem {
    /// Returns true if the item is a folder
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

/// Reference to a child of a container, as returned by a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildReference {
    pub id: String,
}

/// One page of a container listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildPage {
    pub items: Vec<ChildReference>,
    /// Continuation cursor; `None` when this is the last page
    pub next_cursor: Option<PageCursor>,
}

/// Metadata for an item about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRemoteFile {
    pub title: String,
    /// Parent container; `None` places the item in the drive root
    pub parent: Option<ContainerId>,
    pub mime_type: Option<String>,
}

impl NewRemoteFile {
    /// Metadata for a regular file under `parent`
    pub fn file(title: impl Into<String>, parent: ContainerId) -> Self {
        Self {
            title: title.into(),
            parent: Some(parent),
            mime_type: None,
        }
    }
}

// ============================================================================
// IRemoteCatalog trait
// ============================================================================

/// Port trait for remote catalog operations
///
/// Implementations perform exactly one remote request per call and map
/// every failure to a [`RemoteError`].
#[async_trait::async_trait]
pub trait IRemoteCatalog: Send + Sync {
    /// Lists one page of the children of `container`
    ///
    /// # Arguments
    /// * `container` - The container whose children are listed
    /// * `query` - Server-side filter expression
    /// * `cursor` - Continuation cursor from the previous page (None for the first page)
    async fn list_children(
        &self,
        container: &ContainerId,
        query: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<ChildPage, RemoteError>;

    /// Retrieves the full metadata of a single item
    async fn get_file(&self, id: &RemoteId) -> Result<RemoteItem, RemoteError>;

    /// Creates a new file with the content of `source`
    ///
    /// # Returns
    /// Metadata of the created item
    async fn insert_file(
        &self,
        metadata: &NewRemoteFile,
        source: &Path,
    ) -> Result<RemoteItem, RemoteError>;

    /// Finds non-trashed folders whose title equals `title`
    async fn find_folders(&self, title: &str) -> Result<Vec<RemoteItem>, RemoteError>;

    /// Creates a folder named `title` under `parent`
    async fn create_folder(
        &self,
        title: &str,
        parent: &ContainerId,
    ) -> Result<RemoteItem, RemoteError>;
}
