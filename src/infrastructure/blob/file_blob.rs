//! File-backed blob store.

use super::service::{BlobError, BlobResult, BlobStore};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file that is then renamed over the target,
/// so a reader never observes a half-written table.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Creates the store, creating `dir` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> BlobResult<Self> {
        let dir = dir.into();

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            BlobError::Io(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        info!("File blob store at {}", dir.display());

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let path = self.path_for(key);

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlobError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(&self, key: &str, blob: &[u8]) -> BlobResult<()> {
        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));

        tokio::fs::write(&tmp_path, blob).await.map_err(|e| {
            BlobError::Io(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;

        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| {
            BlobError::Io(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("file ({})", self.dir.display())
    }
}
