//! Upload scheduler - bounded worker pool draining the upload queue
//!
//! The [`UploadScheduler`] feeds tasks one at a time into a queue of
//! capacity 1, from which `W` workers pull. Each worker reports every
//! finished task on a completion channel and the caller waits until the
//! number of completions equals the number of tasks.
//!
//! ## Flow
//!
//! ```text
//! dispatcher ──→ mpsc(1) ──→ worker 1..W ──→ uploader(task)
//!                                 │
//!                          completion channel ──→ UploadReport
//! ```
//!
//! A failing, panicking or cancelled upload is reported as a failure of
//! that task only; sibling uploads keep running.

use std::future::Future;
use std::sync::Arc;

use drivebackup_core::domain::UploadTask;
use drivebackup_core::ports::RemoteItem;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::SyncError;

/// Capacity of the task queue; the dispatcher blocks while it is full
const QUEUE_CAPACITY: usize = 1;

// ============================================================================
// UploadReport
// ============================================================================

/// A file that reached the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub remote_id: String,
}

/// A file whose upload failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: String,
}

/// Outcome of draining one upload queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub succeeded: Vec<UploadedFile>,
    pub failed: Vec<FailedUpload>,
}

impl UploadReport {
    /// Number of tasks that completed either way
    pub fn completed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Completion signal sent by a worker
struct Completion {
    file_name: String,
    result: Result<String, String>,
}

// ============================================================================
// UploadScheduler
// ============================================================================

/// Runs uploads with at most `workers` in flight
#[derive(Debug, Clone)]
pub struct UploadScheduler {
    workers: usize,
}

impl UploadScheduler {
    /// Creates a scheduler; a worker count of 0 is raised to 1
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Uploads every task and waits until all of them completed
    ///
    /// # Arguments
    /// * `tasks` - Tasks to dispatch, in order
    /// * `uploader` - Performs one upload (retries included)
    pub async fn run<F, Fut>(&self, tasks: Vec<UploadTask>, uploader: F) -> UploadReport
    where
        F: Fn(UploadTask) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RemoteItem, SyncError>> + Send + 'static,
    {
        let total = tasks.len();
        let mut report = UploadReport::default();
        if total == 0 {
            return report;
        }

        let worker_count = self.workers.min(total);
        info!(tasks = total, workers = worker_count, "Starting uploads");

        let uploader = Arc::new(uploader);
        let (task_tx, task_rx) = mpsc::channel::<UploadTask>(QUEUE_CAPACITY);
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

        for worker_id in 0..worker_count {
            let task_rx = Arc::clone(&task_rx);
            let done_tx = done_tx.clone();
            let uploader = Arc::clone(&uploader);

            tokio::spawn(async move {
                loop {
                    let next = task_rx.lock().await.recv().await;
                    let Some(task) = next else { break };

                    let file_name = task.record.display_name().to_string();
                    debug!(worker_id, file = %file_name, "Uploading");

                    // Run the upload as its own task so a panic fails only this file
                    let result = match tokio::spawn((*uploader)(task)).await {
                        Ok(Ok(item)) => Ok(item.id),
                        Ok(Err(err)) => Err(err.to_string()),
                        Err(join_err) => Err(SyncError::Worker(join_err.to_string()).to_string()),
                    };

                    if done_tx.send(Completion { file_name, result }).is_err() {
                        break;
                    }
                }
                debug!(worker_id, "Worker finished");
            });
        }
        drop(done_tx);

        let dispatcher = tokio::spawn(async move {
            for task in tasks {
                if task_tx.send(task).await.is_err() {
                    break;
                }
            }
        });

        let mut completed = 0;
        while completed < total {
            let Some(completion) = done_rx.recv().await else {
                error!(completed, total, "All workers exited before the queue drained");
                break;
            };
            completed += 1;

            match completion.result {
                Ok(remote_id) => {
                    info!(file = %completion.file_name, remote_id = %remote_id, "Uploaded");
                    report.succeeded.push(UploadedFile {
                        file_name: completion.file_name,
                        remote_id,
                    });
                }
                Err(error) => {
                    warn!(file = %completion.file_name, error = %error, "Upload failed");
                    report.failed.push(FailedUpload {
                        file_name: completion.file_name,
                        error,
                    });
                }
            }
        }

        if let Err(e) = dispatcher.await {
            error!(error = %e, "Upload dispatcher failed");
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Uploads finished"
        );
        report
    }
}
