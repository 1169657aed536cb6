//! Destination folder resolution
//!
//! Maps the configured folder title to a container: an empty title means
//! the drive root, one match is used as is, several matches are an error,
//! and a missing folder is created under the root when allowed.

use drivebackup_core::domain::newtypes::ContainerId;
use drivebackup_core::ports::IRemoteCatalog;
use tracing::{info, instrument};

use crate::retry::RetryPolicy;
use crate::SyncError;

/// Resolves `folder_name` to the container uploads should go to
#[instrument(skip(catalog, retry))]
pub async fn resolve_destination(
    catalog: &dyn IRemoteCatalog,
    retry: &RetryPolicy,
    folder_name: &str,
    create_missing: bool,
) -> Result<ContainerId, SyncError> {
    let name = folder_name.trim();
    if name.is_empty() {
        return Ok(ContainerId::root());
    }

    let matches: Vec<_> = retry
        .execute("find_folders", || catalog.find_folders(name))
        .await
        .map_err(|e| SyncError::from_retry("find_folders", e))?
        .into_iter()
        .filter(|item| item.is_folder() && !item.trashed)
        .collect();

    match matches.as_slice() {
        [] if create_missing => {
            let root = ContainerId::root();
            let folder = retry
                .execute("create_folder", || catalog.create_folder(name, &root))
                .await
                .map_err(|e| SyncError::from_retry("create_folder", e))?;
            info!(folder = name, id = %folder.id, "Created remote folder");
            Ok(ContainerId::new(folder.id)?)
        }
        [] => Err(SyncError::FolderNotFound(name.to_string())),
        [folder] => Ok(ContainerId::new(folder.id.clone())?),
        many => Err(SyncError::AmbiguousFolder {
            name: name.to_string(),
            matches: many.len(),
        }),
    }
}
