//! Blob store trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur while reading or writing a blob.
#[derive(Debug)]
pub enum BlobError {
    Io(String),
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Blob I/O error: {}", e),
        }
    }
}

impl std::error::Error for BlobError {}

/// Result type for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Key-value medium holding whole serialized tables.
///
/// The mapping store reads its table once at startup and writes the full table
/// back after every mutation, while still holding its own write lock. A blob
/// store therefore only needs atomic whole-value replacement per key.
///
/// # Implementations
///
/// - [`crate::infrastructure::blob::FileBlobStore`] - one JSON file per key
/// - [`crate::infrastructure::blob::NullBlobStore`] - nothing is kept
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Reads the blob stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` if the key has been written before
    /// - `Ok(None)` if nothing is stored under the key
    async fn read(&self, key: &str) -> BlobResult<Option<Vec<u8>>>;

    /// Replaces the blob stored under `key`.
    async fn write(&self, key: &str, blob: &[u8]) -> BlobResult<()>;

    /// Human-readable description for startup logs and health checks.
    fn describe(&self) -> String;
}
