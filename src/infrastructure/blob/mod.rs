//! Whole-value key-value storage for serialized tables.
//!
//! Provides a [`BlobStore`] trait with two implementations:
//! - [`FileBlobStore`] - JSON files in a data directory
//! - [`NullBlobStore`] - No-op implementation for in-memory operation

mod file_blob;
mod null_blob;
mod service;

pub use file_blob::FileBlobStore;
pub use null_blob::NullBlobStore;
pub use service::{BlobError, BlobResult, BlobStore};
