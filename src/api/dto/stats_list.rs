//! DTOs for the statistics listing.

use serde::Serialize;

use super::stats::StatsResponse;

/// Every short URL, newest first.
#[derive(Debug, Serialize)]
pub struct StatsListResponse {
    pub total: usize,
    pub items: Vec<StatsResponse>,
}
