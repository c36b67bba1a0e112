//! No-op blob store for purely in-memory operation.

use super::service::{BlobResult, BlobStore};
use async_trait::async_trait;
use tracing::debug;

/// A blob store that keeps nothing.
///
/// Used when no data directory is configured. Tables live only as long as the
/// process does.
pub struct NullBlobStore;

impl NullBlobStore {
    pub fn new() -> Self {
        debug!("Using NullBlobStore (persistence disabled)");
        Self
    }
}

impl Default for NullBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for NullBlobStore {
    async fn read(&self, _key: &str) -> BlobResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _blob: &[u8]) -> BlobResult<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory only".to_string()
    }
}
