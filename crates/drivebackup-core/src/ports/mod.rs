//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the domain core depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteCatalog`] - Listing, fetching and inserting items in the remote store

pub mod remote_catalog;

pub use remote_catalog::{
    ChildPage, ChildReference, IRemoteCatalog, NewRemoteFile, RemoteError, RemoteItem,
    FOLDER_MIME_TYPE,
};
