//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for remote identifiers,
//! pagination cursors and content digests. Each newtype ensures data
//! validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Identifier of the well-known root container of a drive
const ROOT_CONTAINER: &str = "root";

/// Number of hex characters in an MD5 digest
const MD5_HEX_LEN: usize = 32;

/// Returns true if `c` may appear in a Drive item identifier
fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

// ============================================================================
// ContentHash
// ============================================================================

/// Hex-encoded MD5 digest of a file's full byte content
///
/// Always stored in lowercase so that locally computed digests compare
/// equal to the `md5Checksum` field reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Create a new ContentHash from a hex string
    ///
    /// Uppercase input is accepted and normalized to lowercase.
    ///
    /// # Errors
    /// Returns error if the value is not exactly 32 hexadecimal characters
    pub fn new(hash: String) -> Result<Self, DomainError> {
        if hash.len() != MD5_HEX_LEN {
            return Err(DomainError::InvalidHash(format!(
                "expected {MD5_HEX_LEN} hex characters, got {}: {hash}",
                hash.len()
            )));
        }
        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidHash(format!(
                "non-hexadecimal character in {hash}"
            )));
        }
        Ok(Self(hash.to_ascii_lowercase()))
    }

    /// Build a ContentHash from raw digest bytes
    #[must_use]
    pub fn from_digest(bytes: [u8; 16]) -> Self {
        let hex = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
        Self(hex)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ContentHash {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

// ============================================================================
// RemoteId
// ============================================================================

/// Identifier of a single item in the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteId(String);

impl RemoteId {
    /// Create a new RemoteId
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains characters Drive never
    /// emits in identifiers
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRemoteId(
                "Remote ID cannot be empty".to_string(),
            ));
        }
        if !id.chars().all(is_id_char) {
            return Err(DomainError::InvalidRemoteId(format!(
                "Remote ID contains invalid characters: {id}"
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RemoteId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemoteId> for String {
    fn from(id: RemoteId) -> Self {
        id.0
    }
}

// ============================================================================
// ContainerId
// ============================================================================

/// Identifier of a container (folder) in the remote store
///
/// The well-known `root` container is used whenever no folder is named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContainerId(String);

impl ContainerId {
    /// Create a new ContainerId
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains invalid characters
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() || !id.chars().all(is_id_char) {
            return Err(DomainError::InvalidContainerId(id));
        }
        Ok(Self(id))
    }

    /// The drive's root container
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_CONTAINER.to_string())
    }

    /// Returns true if this is the well-known root container
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_CONTAINER
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for ContainerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContainerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ContainerId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

impl From<RemoteId> for ContainerId {
    fn from(id: RemoteId) -> Self {
        Self(id.0)
    }
}

// ============================================================================
// PageCursor
// ============================================================================

/// Opaque continuation token returned by a paginated listing
///
/// An empty token from the server means the listing is exhausted, so a
/// `PageCursor` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Converts a raw `nextPageToken` into a cursor
    ///
    /// Returns `None` for an absent or empty token (end of pagination).
    #[must_use]
    pub fn from_token(token: Option<String>) -> Option<Self> {
        token.filter(|t| !t.is_empty()).map(Self)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PageCursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
