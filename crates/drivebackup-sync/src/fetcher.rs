//! Remote inventory fetching
//!
//! Walks the paginated child listing of a container and resolves every
//! child to a full record with a separate metadata call. All calls go
//! through the retry policy; rate limiting is invisible unless it lasts
//! through every attempt.

use drivebackup_core::domain::newtypes::{ContainerId, ContentHash, PageCursor, RemoteId};
use drivebackup_core::domain::RemoteFileRecord;
use drivebackup_core::ports::{IRemoteCatalog, RemoteItem, FOLDER_MIME_TYPE};
use tracing::{debug, info, instrument, warn};

use crate::retry::RetryPolicy;
use crate::SyncError;

/// Server-side filter selecting non-folder, non-trashed children
pub fn file_filter() -> String {
    format!("mimeType != '{FOLDER_MIME_TYPE}' and trashed != true")
}

/// Converts a fetched item into a record
///
/// A checksum that is not a valid MD5 digest is dropped, so the item can
/// never match a local file.
fn to_record(item: RemoteItem) -> Result<RemoteFileRecord, SyncError> {
    let hash = match item.md5_checksum {
        Some(raw) => match ContentHash::new(raw) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(id = %item.id, error = %e, "Ignoring malformed checksum");
                None
            }
        },
        None => None,
    };
    Ok(RemoteFileRecord::new(
        RemoteId::new(item.id)?,
        item.title,
        hash,
    ))
}

/// Returns a record for every non-folder, non-trashed item in `container`
///
/// `None` lists the drive root.
#[instrument(skip_all, fields(container = tracing::field::Empty))]
pub async fn fetch_remote(
    catalog: &dyn IRemoteCatalog,
    retry: &RetryPolicy,
    container: Option<&ContainerId>,
) -> Result<Vec<RemoteFileRecord>, SyncError> {
    let root = ContainerId::root();
    let container = container.unwrap_or(&root);
    tracing::Span::current().record("container", container.as_str());

    let query = file_filter();
    let mut cursor: Option<PageCursor> = None;
    let mut child_ids = Vec::new();

    loop {
        let page = retry
            .execute("list_children", || {
                catalog.list_children(container, &query, cursor.as_ref())
            })
            .await
            .map_err(|e| SyncError::from_retry("list_children", e))?;

        debug!(items = page.items.len(), more = page.next_cursor.is_some(), "Fetched listing page");
        child_ids.extend(page.items.into_iter().map(|c| c.id));

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let mut records = Vec::with_capacity(child_ids.len());
    for raw_id in child_ids {
        let id = RemoteId::new(raw_id)?;
        let item = retry
            .execute("get_file", || catalog.get_file(&id))
            .await
            .map_err(|e| SyncError::from_retry("get_file", e))?;

        // The listing filter already excludes these; the item may have
        // changed between the two calls.
        if item.is_folder() || item.trashed {
            debug!(id = %id, "Skipping folder or trashed item");
            continue;
        }
        records.push(to_record(item)?);
    }

    info!(files = records.len(), "Remote fetch complete");
    Ok(records)
}
