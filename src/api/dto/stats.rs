//! DTOs for per-shortcode statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::clicks::ClickInfo;
use crate::application::services::UrlStats;

/// Statistics for a single short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub shortcode: String,
    pub short_url: String,
    pub long_url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
    pub click_details: Vec<ClickInfo>,
}

impl StatsResponse {
    pub fn from_stats(stats: UrlStats, base_url: &str) -> Self {
        Self {
            short_url: crate::application::services::short_url(base_url, &stats.shortcode),
            shortcode: stats.shortcode,
            long_url: stats.long_url,
            clicks: stats.clicks,
            created_at: stats.created_at,
            expires_at: stats.expires_at,
            expired: stats.expired,
            click_details: stats.click_details.into_iter().map(ClickInfo::from).collect(),
        }
    }
}
