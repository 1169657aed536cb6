//! DriveCatalog - IRemoteCatalog implementation for Google Drive v2
//!
//! Wraps the [`DriveClient`] and delegates to the [`files`] and [`upload`]
//! modules to fulfil the [`IRemoteCatalog`] port contract.
//!
//! ## Design Notes
//!
//! - `DriveClient` is immutable once built, so the catalog holds it
//!   directly and concurrent upload workers share one connection pool.
//! - No method retries. Rate-limit handling belongs to the caller.

use std::path::Path;

use drivebackup_core::domain::newtypes::{ContainerId, PageCursor, RemoteId};
use drivebackup_core::ports::{
    ChildPage, IRemoteCatalog, NewRemoteFile, RemoteError, RemoteItem,
};
use tracing::debug;

use crate::client::DriveClient;
use crate::{files, upload};

/// Remote catalog backed by the Google Drive v2 REST API
#[derive(Debug, Clone)]
pub struct DriveCatalog {
    client: DriveClient,
}

impl DriveCatalog {
    /// Creates a new `DriveCatalog` wrapping the given [`DriveClient`]
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client
    pub fn client(&self) -> &DriveClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IRemoteCatalog for DriveCatalog {
    async fn list_children(
        &self,
        container: &ContainerId,
        query: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<ChildPage, RemoteError> {
        files::list_children(&self.client, container, query, cursor).await
    }

    async fn get_file(&self, id: &RemoteId) -> Result<RemoteItem, RemoteError> {
        files::get_file(&self.client, id).await
    }

    async fn insert_file(
        &self,
        metadata: &NewRemoteFile,
        source: &Path,
    ) -> Result<RemoteItem, RemoteError> {
        debug!(
            title = %metadata.title,
            source = %source.display(),
            "DriveCatalog::insert_file"
        );
        upload::insert_multipart(&self.client, metadata, source).await
    }

    async fn find_folders(&self, title: &str) -> Result<Vec<RemoteItem>, RemoteError> {
        files::find_folders(&self.client, title).await
    }

    async fn create_folder(
        &self,
        title: &str,
        parent: &ContainerId,
    ) -> Result<RemoteItem, RemoteError> {
        files::create_folder(&self.client, title, parent).await
    }
}
