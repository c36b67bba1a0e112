//! Repository implementations.
//!
//! - [`MemoryUrlRepository`] - Lock-guarded shortcode table, snapshotted to a
//!   [`crate::infrastructure::blob::BlobStore`] under [`SNAPSHOT_KEY`]

pub mod memory_url_repository;

pub use memory_url_repository::{MemoryUrlRepository, SNAPSHOT_KEY, decode_table, encode_table};
