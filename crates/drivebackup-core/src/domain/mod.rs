//! Domain entities
//!
//! This module contains the core domain types for drivebackup:
//! - Newtypes for validated identifiers and content digests
//! - File records produced by the local scanner and the remote fetcher
//! - Upload tasks produced by the planning step
//! - Domain-specific error types

pub mod errors;
pub mod newtypes;
pub mod records;

// Re-export commonly used types
pub use errors::DomainError;
pub use newtypes::*;
pub use records::{LocalFileRecord, RemoteFileRecord, UploadTask};
