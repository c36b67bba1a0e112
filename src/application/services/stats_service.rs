//! Per-shortcode analytics read from the mapping table.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{ClickEvent, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::clock::Clock;

/// Analytics view of one record, evaluated at a single instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStats {
    pub shortcode: String,
    pub long_url: String,
    pub clicks: u64,
    pub click_details: Vec<ClickEvent>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
}

impl UrlStats {
    fn from_record(record: UrlRecord, now: DateTime<Utc>) -> Self {
        let expired = record.is_expired_at(now);

        Self {
            shortcode: record.shortcode,
            long_url: record.long_url,
            clicks: record.clicks,
            click_details: record.click_details,
            created_at: record.created_at,
            expires_at: record.expires_at,
            expired,
        }
    }
}

/// Read-only statistics over the mapping table.
///
/// Reading stats never records a click and never logs an audit event.
pub struct StatsService<R: UrlRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: UrlRepository> StatsService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Statistics for one shortcode, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the shortcode is unknown.
    pub async fn get_stats(&self, shortcode: &str) -> Result<UrlStats, AppError> {
        let record = self
            .repository
            .find_by_code(shortcode)
            .await?
            .ok_or_else(|| AppError::NotFound {
                code: shortcode.to_string(),
            })?;

        Ok(UrlStats::from_record(record, self.clock.now()))
    }

    /// Statistics for every record, newest first.
    pub async fn list_stats(&self) -> Result<Vec<UrlStats>, AppError> {
        let now = self.clock.now();
        let mut records = self.repository.list().await?;

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.shortcode.cmp(&b.shortcode))
        });

        Ok(records
            .into_iter()
            .map(|record| UrlStats::from_record(record, now))
            .collect())
    }

    pub async fn total_records(&self) -> Result<usize, AppError> {
        self.repository.count().await
    }
}
