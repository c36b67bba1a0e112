//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{BatchSummary, ShortenRequest, ShortenResponse, ShortenResultItem};
use crate::application::services::short_url;
use crate::error::AppError;
use crate::state::AppState;

/// Creates short URLs for one or more long URLs.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Batch Processing
///
/// Items are processed independently and in order. A failed item does not
/// affect the others; its error is reported in place.
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     { "url": "https://example.com", "validity": 60, "shortcode": "promo1" },
///     { "url": "https://example.org" }
///   ]
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 2, "successful": 2, "failed": 0 },
///   "items": [
///     {
///       "longUrl": "https://example.com",
///       "shortcode": "promo1",
///       "shortUrl": "http://localhost:3000/promo1",
///       "createdAt": "2024-05-01T10:00:00Z",
///       "expiresAt": "2024-05-01T11:00:00Z"
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the batch is empty or larger than the configured
/// maximum. Individual URL errors are returned in the response items array.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    if payload.urls.is_empty() {
        return Err(AppError::bad_request("At least one URL is required"));
    }

    let max = state.settings.max_batch_size;
    if payload.urls.len() > max {
        return Err(AppError::bad_request(format!(
            "Too many URLs in one request (max {max}, got {})",
            payload.urls.len()
        )));
    }

    let total = payload.urls.len();
    let mut results = Vec::with_capacity(total);
    let mut successful = 0;
    let mut failed = 0;

    for item in payload.urls {
        let long_url = item.url.clone();

        match state
            .link_service
            .create(item.url, item.validity, item.shortcode)
            .await
        {
            Ok(record) => {
                successful += 1;
                results.push(ShortenResultItem::Success {
                    short_url: short_url(&state.settings.base_url, &record.shortcode),
                    long_url: record.long_url,
                    shortcode: record.shortcode,
                    created_at: record.created_at,
                    expires_at: record.expires_at,
                });
            }
            Err(err) => {
                failed += 1;
                results.push(ShortenResultItem::Error {
                    long_url,
                    error: err.to_error_info(),
                });
            }
        }
    }

    Ok(Json(ShortenResponse {
        summary: BatchSummary {
            total,
            successful,
            failed,
        },
        items: results,
    }))
}
