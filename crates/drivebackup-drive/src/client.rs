//! Google Drive API client
//!
//! Provides the authenticated transport used by the catalog adapter.
//! Every request carries the bearer token; every non-success response is
//! turned into a [`RemoteError::Api`] carrying the status, the decoded
//! message and reason, and the raw body.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use drivebackup_drive::client::DriveClient;
//! use reqwest::Method;
//!
//! # async fn example() -> Result<(), drivebackup_core::ports::RemoteError> {
//! let client = DriveClient::new("access-token-here");
//! let about: serde_json::Value = client
//!     .get_json(client.request(Method::GET, "/about"))
//!     .await?;
//! println!("{about}");
//! # Ok(())
//! # }
//! ```

use drivebackup_core::config::{DriveConfig, DEFAULT_DRIVE_BASE_URL, DEFAULT_DRIVE_UPLOAD_BASE_URL};
use drivebackup_core::ports::RemoteError;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

// ============================================================================
// Error response types
// ============================================================================

/// Envelope of a Google API error response
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// Body of a Google API error
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

/// A single entry of `error.errors[]`
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// Builds a [`RemoteError::Api`] from a non-success status and its body
///
/// The message and first reason are taken from the JSON envelope when the
/// body decodes; otherwise the canonical status text is used.
pub(crate) fn api_error(status: u16, body: String) -> RemoteError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();

    let message = envelope
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown status")
                .to_string()
        });

    let reason = envelope
        .and_then(|e| e.error.errors.into_iter().next())
        .and_then(|d| d.reason);

    let err = RemoteError::api(status, message);
    let err = match reason {
        Some(reason) => err.with_reason(reason),
        None => err,
    };

    if body.is_empty() {
        err
    } else {
        err.with_body(body)
    }
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Google Drive v2 calls
///
/// Wraps `reqwest::Client` with the bearer token and the two base URLs
/// (metadata and media upload) of the Drive API.
#[derive(Debug, Clone)]
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for metadata requests
    base_url: String,
    /// Base URL for media upload requests
    upload_base_url: String,
    /// OAuth2 access token
    access_token: String,
}

impl DriveClient {
    /// Creates a new DriveClient against the public Google endpoints
    ///
    /// # Arguments
    /// * `access_token` - A valid OAuth2 access token with a Drive scope
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(
            access_token,
            DEFAULT_DRIVE_BASE_URL,
            DEFAULT_DRIVE_UPLOAD_BASE_URL,
        )
    }

    /// Creates a new DriveClient with custom base URLs (useful for testing)
    ///
    /// # Arguments
    /// * `access_token` - A valid OAuth2 access token
    /// * `base_url` - Base URL for metadata requests
    /// * `upload_base_url` - Base URL for media uploads
    pub fn with_base_urls(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_slash(base_url.into()),
            upload_base_url: trim_slash(upload_base_url.into()),
            access_token: access_token.into(),
        }
    }

    /// Creates a DriveClient from the `drive` configuration section
    pub fn from_config(access_token: impl Into<String>, config: &DriveConfig) -> Self {
        Self::with_base_urls(
            access_token,
            config.base_url.clone(),
            config.upload_base_url.clone(),
        )
    }

    /// Returns a reference to the current access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the base URL for metadata requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the base URL for media uploads
    pub fn upload_base_url(&self) -> &str {
        &self.upload_base_url
    }

    /// Creates an authenticated request builder against the metadata endpoint
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the base URL (e.g., "/files/root/children")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Creates an authenticated request builder against the upload endpoint
    pub fn upload_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.upload_base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Sends a request and maps transport and status failures
    ///
    /// Exactly one HTTP exchange happens per call; nothing is retried here.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, RemoteError> {
        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Drive response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        trace!(status = status.as_u16(), body = %body, "Drive error body");

        Err(api_error(status.as_u16(), body))
    }

    /// Sends a request and decodes the JSON response body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = self.send(builder).await?;
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        trace!(body = %text, "Drive response body");

        serde_json::from_str(&text).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
