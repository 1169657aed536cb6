//! Upload planning
//!
//! A local file needs uploading exactly when no remote file in the target
//! container has the same content hash. File names play no part: a renamed
//! copy of an existing file is skipped, a changed file under an existing
//! name is uploaded again.

use std::collections::HashSet;

use drivebackup_core::domain::newtypes::{ContainerId, ContentHash};
use drivebackup_core::domain::{LocalFileRecord, RemoteFileRecord, UploadTask};

/// Returns the local records whose hash is absent remotely, in input order
#[must_use]
pub fn plan_uploads(local: &[LocalFileRecord], remote: &[RemoteFileRecord]) -> Vec<LocalFileRecord> {
    let remote_hashes: HashSet<&ContentHash> =
        remote.iter().filter_map(RemoteFileRecord::content_hash).collect();

    local
        .iter()
        .filter(|record| !remote_hashes.contains(record.content_hash()))
        .cloned()
        .collect()
}

/// Wraps planned records into upload tasks targeting `destination`
#[must_use]
pub fn build_tasks(records: Vec<LocalFileRecord>, destination: &ContainerId) -> Vec<UploadTask> {
    records
        .into_iter()
        .map(|record| UploadTask::new(record, destination.clone()))
        .collect()
}
