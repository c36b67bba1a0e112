//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::services::RedirectOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a shortcode to its long URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Wait for the configured redirect delay
/// 2. Look up the shortcode and check expiry
/// 3. Record a click with the `Referer` header as source
/// 4. Return 307 Temporary Redirect
///
/// # Cancellation
///
/// The delay is tied to a token that fires when this handler is dropped, so
/// a client that disconnects before the delay elapses leaves no click behind.
///
/// # Errors
///
/// Returns 404 Not Found if the shortcode doesn't exist.
/// Returns 410 Gone if the short URL has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok());

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let outcome = state
        .redirect_service
        .resolve_after(&code, referrer, state.settings.redirect_delay, &cancel)
        .await?;

    match outcome {
        Some(RedirectOutcome::Success { long_url, .. }) => {
            Ok(Redirect::temporary(&long_url).into_response())
        }
        Some(RedirectOutcome::NotFound) => Err(AppError::NotFound { code }),
        Some(RedirectOutcome::Expired { expires_at }) => Err(AppError::Expired { code, expires_at }),
        None => {
            debug!("Redirect for {} cancelled", code);
            Err(AppError::internal("Redirect cancelled"))
        }
    }
}
