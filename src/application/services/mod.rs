//! Business logic services for the application layer.

pub mod link_service;
pub mod redirect_service;
pub mod stats_service;

pub use link_service::{LinkService, MAX_GENERATION_ATTEMPTS, short_url};
pub use redirect_service::{RedirectOutcome, RedirectService};
pub use stats_service::{StatsService, UrlStats};
