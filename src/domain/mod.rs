//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (`UrlRecord`, `ClickEvent`)
//! - [`repositories`] - Data access trait definitions
//! - [`log_event`] - Audit event model and the fire-and-forget [`log_event::EventLogger`]
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Business rules live in services (see [`crate::application::services`]).
//!
//! # Redirect Flow
//!
//! 1. HTTP handler or CLI calls [`crate::application::services::RedirectService`]
//! 2. The record is looked up via [`repositories::UrlRepository`]
//! 3. Live records get a [`entities::ClickEvent`] appended atomically
//! 4. Each transition is reported through [`log_event::EventLogger`]

pub mod entities;
pub mod log_event;
pub mod repositories;
