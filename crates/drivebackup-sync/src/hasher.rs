//! Content hashing
//!
//! Computes the MD5 digest Drive reports as `md5Checksum`, so local and
//! remote files can be compared without downloading anything. Content is
//! streamed in fixed-size chunks and never held in memory as a whole.

use std::path::Path;

use drivebackup_core::domain::newtypes::ContentHash;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{instrument, trace};

/// Read buffer size used while hashing
const CHUNK_SIZE: usize = 64 * 1024;

// ============================================================================
// ContentHasher
// ============================================================================

/// Digest of a byte stream together with its length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedContent {
    pub hash: ContentHash,
    pub size: u64,
}

/// Streams `reader` to its end and returns the MD5 digest and byte count
pub async fn hash_reader<R>(mut reader: R) -> std::io::Result<HashedContent>
where
    R: AsyncRead + Unpin,
{
    let mut context = md5::Context::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut size: u64 = 0;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        context.consume(&buf[..n]);
        size += n as u64;
    }

    Ok(HashedContent {
        hash: ContentHash::from_digest(context.compute().0),
        size,
    })
}

/// Opens `path` and hashes its full content
#[instrument(level = "trace")]
pub async fn hash_file(path: &Path) -> std::io::Result<HashedContent> {
    let file = tokio::fs::File::open(path).await?;
    let hashed = hash_reader(file).await?;
    trace!(hash = %hashed.hash, size = hashed.size, "hash computed");
    Ok(hashed)
}

/// Hashes an in-memory buffer
#[must_use]
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    ContentHash::from_digest(md5::compute(data).0)
}
