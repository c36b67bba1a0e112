//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Field names are camelCase, matching the stored
//! record format.

pub mod clicks;
pub mod health;
pub mod shorten;
pub mod stats;
pub mod stats_list;
