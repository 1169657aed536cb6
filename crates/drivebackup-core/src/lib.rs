//! drivebackup Core - Domain types, ports and configuration
//!
//! This crate contains the pieces shared by every other drivebackup crate:
//! - **Domain records** - `LocalFileRecord`, `RemoteFileRecord`, `UploadTask`
//! - **Newtypes** - `ContentHash`, `RemoteId`, `ContainerId`, `PageCursor`
//! - **Port definitions** - `IRemoteCatalog`, the contract a remote store adapter implements
//! - **Configuration** - YAML-backed settings with validation and a builder
//!
//! # Architecture
//!
//! The domain module holds plain data with validation and no I/O.
//! Ports define trait interfaces that adapter crates implement; the sync
//! crate orchestrates domain records through those ports.

pub mod config;
pub mod domain;
pub mod ports;
