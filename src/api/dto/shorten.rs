//! DTOs for the shortening endpoint.

use crate::error::ErrorInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten one or more URLs.
///
/// Batch bounds (at least one URL, at most the configured maximum) are
/// checked by the handler.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(nested)]
    pub urls: Vec<UrlItem>,
}

/// Individual URL to be shortened.
///
/// Format checks on `url` and `shortcode` happen in the service so that each
/// failure is reported against its own item.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UrlItem {
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,

    /// Validity in minutes; the configured default applies when absent.
    pub validity: Option<i64>,

    /// Optional custom shortcode (alphanumeric, 4-10 characters).
    pub shortcode: Option<String>,
}

/// Response containing batch processing results.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Individual result for a URL in the batch, in request order.
///
/// Uses untagged enum for cleaner JSON structure (no discriminator field).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResultItem {
    #[serde(rename_all = "camelCase")]
    Success {
        long_url: String,
        shortcode: String,
        short_url: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Error { long_url: String, error: ErrorInfo },
}

/// Summary statistics for batch processing.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
