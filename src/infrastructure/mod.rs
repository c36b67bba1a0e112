//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence and audit delivery.
//!
//! # Modules
//!
//! - [`audit`] - Audit event sinks and the background delivery worker
//! - [`blob`] - Key/blob storage backing the table snapshot (file and no-op)
//! - [`persistence`] - In-memory shortcode table

pub mod audit;
pub mod blob;
pub mod persistence;
