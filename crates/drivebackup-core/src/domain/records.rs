//! File records exchanged between the scanner, the remote catalog and the
//! upload planner
//!
//! Records are immutable snapshots. A [`LocalFileRecord`] describes one
//! regular file at the top level of the backup directory; a
//! [`RemoteFileRecord`] describes one non-folder item inside the target
//! container; an [`UploadTask`] pairs a local record with its destination.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{ContainerId, ContentHash, RemoteId};

// ============================================================================
// LocalFileRecord
// ============================================================================

/// A regular file found directly inside the backup directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFileRecord {
    path: PathBuf,
    display_name: String,
    content_hash: ContentHash,
    size: u64,
}

impl LocalFileRecord {
    /// Creates a record for `path`
    ///
    /// The display name is the final path component; it becomes the remote
    /// title on upload. Bytes that are not valid UTF-8 are replaced with
    /// U+FFFD in the display name only; `path` keeps the original name.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the path has no file name
    pub fn new(path: PathBuf, content_hash: ContentHash, size: u64) -> Result<Self, DomainError> {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::InvalidPath(path.display().to_string()))?;

        Ok(Self {
            path,
            display_name,
            content_hash,
            size,
        })
    }

    /// Absolute or directory-relative path of the file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used as the remote title
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// MD5 digest of the file's content
    #[must_use]
    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }
}

// ============================================================================
// RemoteFileRecord
// ============================================================================

/// A non-folder, non-trashed item in the remote container
///
/// Native documents report no checksum; they carry `None` and never match
/// a local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    id: RemoteId,
    title: String,
    content_hash: Option<ContentHash>,
}

impl RemoteFileRecord {
    #[must_use]
    pub fn new(id: RemoteId, title: impl Into<String>, content_hash: Option<ContentHash>) -> Self {
        Self {
            id,
            title: title.into(),
            content_hash,
        }
    }

    #[must_use]
    pub fn id(&self) -> &RemoteId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.content_hash.as_ref()
    }
}

// ============================================================================
// UploadTask
// ============================================================================

/// One pending upload, consumed exactly once by a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub record: LocalFileRecord,
    pub destination: ContainerId,
}

impl UploadTask {
    #[must_use]
    pub fn new(record: LocalFileRecord, destination: ContainerId) -> Self {
        Self {
            record,
            destination,
        }
    }
}
