//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! mostly validation failures raised by the newtype constructors.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid content hash (expected 32 hexadecimal characters)
    #[error("Invalid hash format: {0}")]
    InvalidHash(String),

    /// Invalid remote item identifier
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Invalid container (folder) identifier
    #[error("Invalid container ID: {0}")]
    InvalidContainerId(String),

    /// A local path that cannot be used as a file record
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
