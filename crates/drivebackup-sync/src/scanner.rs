//! Local inventory scanning
//!
//! Lists the regular files directly inside one directory and hashes each
//! of them. Subdirectories are skipped without being entered. Any I/O
//! failure aborts the scan, so callers never see a partial inventory.

use std::path::Path;

use drivebackup_core::domain::LocalFileRecord;
use tracing::{debug, info, instrument};

use crate::hasher;
use crate::SyncError;

/// Returns one record per top-level regular file of `dir`, ordered by name
///
/// Symbolic links are followed; a link to a directory is skipped like a
/// directory, a dangling link fails the scan.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn scan(dir: &Path) -> Result<Vec<LocalFileRecord>, SyncError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| SyncError::local_io(dir, e))?;

    let mut files = Vec::new();
    loop {
        let entry = entries
            .next_entry()
            .await
            .map_err(|e| SyncError::local_io(dir, e))?;
        let Some(entry) = entry else { break };

        let path = entry.path();
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| SyncError::local_io(&path, e))?;

        if metadata.is_file() {
            files.push(path);
        } else {
            debug!(path = %path.display(), "Skipping non-file entry");
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let hashed = hasher::hash_file(&path)
            .await
            .map_err(|e| SyncError::local_io(&path, e))?;
        debug!(path = %path.display(), hash = %hashed.hash, size = hashed.size, "Scanned file");
        records.push(LocalFileRecord::new(path, hashed.hash, hashed.size)?);
    }

    info!(files = records.len(), "Local scan complete");
    Ok(records)
}
