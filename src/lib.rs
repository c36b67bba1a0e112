//! # linkkeeper
//!
//! A URL shortener with expiring shortcodes and per-click analytics, built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Records, click events, repository traits, audit events
//! - **Application Layer** ([`application`]) - Creation, resolution and statistics services
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory table, snapshots, audit sinks
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Generated or custom shortcodes (alphanumeric, 4-10 characters)
//! - Validity windows with `410 Gone` after expiry; expired codes stay reserved
//! - Lossless click accounting under concurrent redirects
//! - Write-through JSON snapshot of the whole table
//! - Fire-and-forget audit events with a pluggable sink
//!
//! ## Quick Start
//!
//! ```bash
//! export DATA_DIR=./data          # Optional, in-memory only when unset
//! cargo run
//!
//! curl -X POST localhost:3000/api/shorten \
//!   -H 'content-type: application/json' \
//!   -d '{"urls":[{"url":"https://example.com","validity":60}]}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        LinkService, RedirectOutcome, RedirectService, StatsService, UrlStats,
    };
    pub use crate::domain::entities::{ClickEvent, NewUrlRecord, UrlRecord};
    pub use crate::domain::log_event::{EventLogger, LogEvent, LogLevel};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::MemoryUrlRepository;
    pub use crate::state::{AppState, HttpSettings};
    pub use crate::utils::clock::{Clock, ManualClock, SystemClock};
}
