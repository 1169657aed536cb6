//! drivebackup Sync - Backup engine
//!
//! Provides:
//! - Local inventory scanning with content hashing
//! - Paginated remote catalog fetching
//! - Content-based upload planning
//! - Rate-limit aware retries with exponential backoff and jitter
//! - Bounded-concurrency upload dispatch
//!
//! ## Modules
//!
//! - [`hasher`] - MD5 content digests
//! - [`scanner`] - Top-level directory inventory
//! - [`fetcher`] - Remote container inventory
//! - [`diff`] - Upload planning
//! - [`backoff`] - Exponential backoff with shared jitter source
//! - [`rate_limit`] - Rate-limit classification of remote failures
//! - [`retry`] - Generic retry wrapper for remote calls
//! - [`scheduler`] - Worker pool draining the upload queue
//! - [`destination`] - Destination folder resolution
//! - [`engine`] - Pipeline composing all of the above

pub mod backoff;
pub mod destination;
pub mod diff;
pub mod engine;
pub mod fetcher;
pub mod hasher;
pub mod rate_limit;
pub mod retry;
pub mod scanner;
pub mod scheduler;

use std::path::PathBuf;

use drivebackup_core::domain::errors::DomainError;
use drivebackup_core::ports::RemoteError;
use thiserror::Error;

use crate::retry::RetryError;

/// Errors that can occur during a backup run
///
/// Rate limiting never appears here directly: it is absorbed by the retry
/// layer and only surfaces as [`SyncError::RetryExhausted`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote store rejected a call with a non-retryable error
    #[error("{operation} failed: {source}")]
    Remote {
        operation: String,
        #[source]
        source: RemoteError,
    },

    /// A call stayed rate limited through every attempt
    #[error("{operation} still rate limited after {attempts} attempts: {source}")]
    RetryExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: RemoteError,
    },

    /// Reading the local directory or one of its files failed
    #[error("I/O error on {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// More than one remote folder carries the requested title
    #[error("{matches} remote folders are named '{name}'")]
    AmbiguousFolder { name: String, matches: usize },

    /// The destination folder does not exist and creating it is disabled
    #[error("Remote folder not found: {0}")]
    FolderNotFound(String),

    /// An upload task panicked or was cancelled
    #[error("Upload worker failed: {0}")]
    Worker(String),

    /// A domain-level error propagated from drivebackup-core
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl SyncError {
    /// Wraps the outcome of a retried remote call
    pub fn from_retry(operation: impl Into<String>, err: RetryError) -> Self {
        let operation = operation.into();
        match err {
            RetryError::Fatal(source) => Self::Remote { operation, source },
            RetryError::Exhausted { attempts, last } => Self::RetryExhausted {
                operation,
                attempts,
                source: last,
            },
        }
    }

    /// Wraps an I/O error with the path it occurred on
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }
}
