//! Integration tests for drivebackup-drive
//!
//! Uses wiremock to simulate the Google Drive v2 API and verifies
//! end-to-end behavior of the DriveClient error mapping, children
//! listing, file and folder metadata calls, and multipart uploads.

mod common;

mod test_errors;
mod test_files;
mod test_listing;
mod test_upload;
