//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short URL creation and lookup
//! - [`services::redirect_service::RedirectService`] - Resolution with click accounting
//! - [`services::stats_service::StatsService`] - Per-shortcode analytics

pub mod services;
