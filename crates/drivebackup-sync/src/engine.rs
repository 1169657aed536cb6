//! Backup engine
//!
//! The [`BackupEngine`] composes the whole one-way backup of a directory
//! into a remote container.
//!
//! ## Backup Flow
//!
//! 1. **Scan**: hash the top-level files of the local directory
//! 2. **Destination**: resolve (or create) the target folder
//! 3. **Inventory**: fetch the remote listing of the destination
//! 4. **Plan**: keep the local files whose content is missing remotely
//! 5. **Upload**: drain the plan through the bounded worker pool
//!
//! ## Retry Logic
//!
//! Every remote call goes through one shared [`RetryPolicy`]; only
//! rate-limit rejections are retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use drivebackup_core::config::Config;
use drivebackup_core::domain::newtypes::ContainerId;
use drivebackup_core::domain::{LocalFileRecord, RemoteFileRecord, UploadTask};
use drivebackup_core::ports::{IRemoteCatalog, NewRemoteFile, RemoteItem};
use tracing::{info, instrument};

use crate::backoff::BackoffCalculator;
use crate::retry::RetryPolicy;
use crate::scheduler::{UploadReport, UploadScheduler};
use crate::{destination, diff, fetcher, scanner, SyncError};

// ============================================================================
// BackupOptions / BackupReport
// ============================================================================

/// Parameters of a single backup run
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Directory whose top-level files are backed up
    pub local_dir: PathBuf,
    /// Destination folder title; empty means the drive root
    pub remote_folder: String,
    /// Create the destination folder when it does not exist
    pub create_remote: bool,
    /// Concurrent upload workers
    pub workers: usize,
    /// Plan only, upload nothing and create nothing
    pub dry_run: bool,
}

impl BackupOptions {
    /// Options taken from the `backup` configuration section
    pub fn from_config(config: &Config) -> Self {
        Self {
            local_dir: config.backup.local_dir.clone(),
            remote_folder: config.backup.remote_folder.clone(),
            create_remote: config.backup.create_remote,
            workers: config.backup.workers,
            dry_run: false,
        }
    }
}

/// Summary of a completed backup run
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Resolved destination; `None` on a dry run whose folder would be created
    pub destination: Option<ContainerId>,
    /// Number of local files found
    pub scanned: usize,
    /// Number of remote files in the destination
    pub remote_files: usize,
    /// Local files whose content already exists remotely
    pub skipped: usize,
    /// Local files selected for upload
    pub planned: Vec<LocalFileRecord>,
    /// Upload outcome; `None` on a dry run
    pub uploads: Option<UploadReport>,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl BackupReport {
    pub fn uploaded(&self) -> usize {
        self.uploads.as_ref().map_or(0, |u| u.succeeded.len())
    }

    pub fn failed(&self) -> usize {
        self.uploads.as_ref().map_or(0, |u| u.failed.len())
    }

    pub fn is_dry_run(&self) -> bool {
        self.uploads.is_none()
    }
}

// ============================================================================
// BackupEngine
// ============================================================================

/// One-way backup engine
///
/// ## Dependencies
///
/// - `catalog`: remote listing, metadata and insert operations
/// - `retry`: rate-limit retry policy shared by every remote call
pub struct BackupEngine {
    catalog: Arc<dyn IRemoteCatalog>,
    retry: RetryPolicy,
}

impl BackupEngine {
    /// Creates a new `BackupEngine`
    pub fn new(catalog: Arc<dyn IRemoteCatalog>, retry: RetryPolicy) -> Self {
        Self { catalog, retry }
    }

    /// Creates an engine with the retry settings of `config`
    pub fn from_config(catalog: Arc<dyn IRemoteCatalog>, config: &Config) -> Self {
        let backoff = BackoffCalculator::new(std::time::Duration::from_millis(
            config.retry.base_delay_ms,
        ));
        Self::new(catalog, RetryPolicy::new(config.retry.max_attempts, backoff))
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Scans the top-level files of `dir`
    pub async fn scan(&self, dir: &Path) -> Result<Vec<LocalFileRecord>, SyncError> {
        scanner::scan(dir).await
    }

    /// Fetches every file record in `container`
    pub async fn fetch_remote(
        &self,
        container: &ContainerId,
    ) -> Result<Vec<RemoteFileRecord>, SyncError> {
        fetcher::fetch_remote(self.catalog.as_ref(), &self.retry, Some(container)).await
    }

    /// Local records whose content is missing from `remote`
    pub fn plan_uploads(
        &self,
        local: &[LocalFileRecord],
        remote: &[RemoteFileRecord],
    ) -> Vec<LocalFileRecord> {
        diff::plan_uploads(local, remote)
    }

    /// Resolves the destination folder, creating it when allowed
    pub async fn resolve_destination(
        &self,
        folder_name: &str,
        create_missing: bool,
    ) -> Result<ContainerId, SyncError> {
        destination::resolve_destination(
            self.catalog.as_ref(),
            &self.retry,
            folder_name,
            create_missing,
        )
        .await
    }

    /// Uploads `records` into `container` with `workers` concurrent workers
    pub async fn run_uploads(
        &self,
        records: Vec<LocalFileRecord>,
        container: &ContainerId,
        workers: usize,
    ) -> UploadReport {
        let tasks = diff::build_tasks(records, container);
        let catalog = Arc::clone(&self.catalog);
        let retry = self.retry.clone();

        let uploader = move |task: UploadTask| {
            let catalog = Arc::clone(&catalog);
            let retry = retry.clone();
            async move { upload_one(catalog.as_ref(), &retry, task).await }
        };

        UploadScheduler::new(workers).run(tasks, uploader).await
    }

    /// Runs the full backup pipeline
    #[instrument(skip_all, fields(local_dir = %options.local_dir.display(), folder = %options.remote_folder))]
    pub async fn run(&self, options: &BackupOptions) -> Result<BackupReport, SyncError> {
        let started = Instant::now();
        info!(dry_run = options.dry_run, workers = options.workers, "Starting backup");

        // An unreadable directory must fail before any folder is created.
        let local = self.scan(&options.local_dir).await?;

        // A dry run never creates the folder; a missing one simply holds nothing yet.
        let destination = match self
            .resolve_destination(&options.remote_folder, options.create_remote && !options.dry_run)
            .await
        {
            Ok(container) => Some(container),
            Err(SyncError::FolderNotFound(_)) if options.dry_run && options.create_remote => None,
            Err(e) => return Err(e),
        };

        let remote = match &destination {
            Some(container) => self.fetch_remote(container).await?,
            None => Vec::new(),
        };

        let planned = self.plan_uploads(&local, &remote);
        let skipped = local.len() - planned.len();
        info!(
            scanned = local.len(),
            remote = remote.len(),
            planned = planned.len(),
            skipped,
            "Upload plan ready"
        );

        let uploads = match (&destination, options.dry_run) {
            (Some(container), false) => Some(
                self.run_uploads(planned.clone(), container, options.workers)
                    .await,
            ),
            _ => None,
        };

        let report = BackupReport {
            destination,
            scanned: local.len(),
            remote_files: remote.len(),
            skipped,
            planned,
            uploads,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            uploaded = report.uploaded(),
            failed = report.failed(),
            duration_ms = report.duration_ms,
            "Backup complete"
        );
        Ok(report)
    }
}

/// Uploads one task through the retry policy
async fn upload_one(
    catalog: &dyn IRemoteCatalog,
    retry: &RetryPolicy,
    task: UploadTask,
) -> Result<RemoteItem, SyncError> {
    let metadata = NewRemoteFile::file(task.record.display_name(), task.destination.clone());
    let source = task.record.path();

    retry
        .execute("insert_file", || catalog.insert_file(&metadata, source))
        .await
        .map_err(|e| SyncError::from_retry("insert_file", e))
}
