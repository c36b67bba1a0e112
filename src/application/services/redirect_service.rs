//! Redirection resolver.
//!
//! Each resolution moves `Lookup -> {NotFound, Expired, Success}`. Only the
//! `Success` transition mutates the store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::ClickEvent;
use crate::domain::log_event::EventLogger;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::clock::Clock;

/// Terminal state of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The click was recorded; `total_clicks` includes it.
    Success { long_url: String, total_clicks: u64 },
    NotFound,
    /// The record exists but its window has passed. No click was recorded.
    Expired { expires_at: DateTime<Utc> },
}

pub struct RedirectService<R: UrlRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    logger: EventLogger,
}

impl<R: UrlRepository> RedirectService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, logger: EventLogger) -> Self {
        Self {
            repository,
            clock,
            logger,
        }
    }

    /// Resolves `shortcode`, recording a click if the record is live.
    ///
    /// `referrer` becomes the click source; a missing or blank one is recorded
    /// as `"Direct"`. The entry and the outcome are both reported to the event
    /// logger, which cannot fail.
    ///
    /// # Errors
    ///
    /// Only storage failures surface as errors; unknown and expired codes are
    /// outcomes, not errors.
    pub async fn resolve(
        &self,
        shortcode: &str,
        referrer: Option<&str>,
    ) -> Result<RedirectOutcome, AppError> {
        self.logger.info(
            "Short URL accessed for redirection",
            json!({ "shortcode": shortcode }),
        );

        let result = self.try_resolve(shortcode, referrer).await;

        match &result {
            Ok(RedirectOutcome::NotFound) => self
                .logger
                .error("Short URL not found", json!({ "shortcode": shortcode })),
            Ok(RedirectOutcome::Expired { expires_at }) => self.logger.warn(
                "Attempted to access expired short URL",
                json!({ "shortcode": shortcode, "expiresAt": expires_at }),
            ),
            Ok(RedirectOutcome::Success {
                long_url,
                total_clicks,
            }) => self.logger.success(
                "Short URL redirected successfully",
                json!({
                    "shortcode": shortcode,
                    "longUrl": long_url,
                    "totalClicks": total_clicks,
                }),
            ),
            Err(e) => self.logger.error(
                "Error during redirection",
                json!({ "shortcode": shortcode, "error": e.to_string() }),
            ),
        }

        result
    }

    async fn try_resolve(
        &self,
        shortcode: &str,
        referrer: Option<&str>,
    ) -> Result<RedirectOutcome, AppError> {
        let Some(record) = self.repository.find_by_code(shortcode).await? else {
            return Ok(RedirectOutcome::NotFound);
        };

        let now = self.clock.now();
        if record.is_expired_at(now) {
            return Ok(RedirectOutcome::Expired {
                expires_at: record.expires_at,
            });
        }

        let event = ClickEvent::new(now, referrer);
        match self.repository.record_click(shortcode, event).await {
            Ok(updated) => Ok(RedirectOutcome::Success {
                long_url: updated.long_url,
                total_clicks: updated.clicks,
            }),
            Err(AppError::NotFound { .. }) => Ok(RedirectOutcome::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Waits `delay`, then resolves.
    ///
    /// Returns `Ok(None)` if `cancel` fires first. In that case nothing is
    /// looked up, logged or recorded.
    pub async fn resolve_after(
        &self,
        shortcode: &str,
        referrer: Option<&str>,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<Option<RedirectOutcome>, AppError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(None),
            () = tokio::time::sleep(delay) => {}
        }

        self.resolve(shortcode, referrer).await.map(Some)
    }
}
