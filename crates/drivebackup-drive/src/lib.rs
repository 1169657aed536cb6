//! drivebackup Drive - Google Drive v2 adapter
//!
//! Provides async access to the parts of the Drive v2 REST API the backup
//! engine needs:
//! - Paginated listing of a folder's children with a search filter
//! - Single-file metadata lookups
//! - Folder lookup by title and folder creation
//! - Multipart file inserts
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP transport with error mapping
//! - [`files`] - Metadata operations on `files` and `children`
//! - [`upload`] - Multipart file uploads
//! - [`catalog`] - [`IRemoteCatalog`](drivebackup_core::ports::IRemoteCatalog) implementation
//!
//! Access tokens are supplied by the caller; this crate never performs an
//! OAuth flow.

pub mod catalog;
pub mod client;
pub mod files;
pub mod upload;

pub use catalog::DriveCatalog;
pub use client::DriveClient;
