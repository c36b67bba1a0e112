//! Handler for per-shortcode statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves statistics for one short URL.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// Works for expired short URLs too; the `expired` flag tells them apart.
/// Reading stats does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if the shortcode doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.get_stats(&code).await?;

    Ok(Json(StatsResponse::from_stats(
        stats,
        &state.settings.base_url,
    )))
}
