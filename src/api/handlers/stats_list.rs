//! Handler for the statistics listing.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::api::dto::stats_list::StatsListResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists statistics for every short URL, newest first.
///
/// # Endpoint
///
/// `GET /api/stats`
pub async fn stats_list_handler(
    State(state): State<AppState>,
) -> Result<Json<StatsListResponse>, AppError> {
    let items: Vec<_> = state
        .stats_service
        .list_stats()
        .await?
        .into_iter()
        .map(|stats| StatsResponse::from_stats(stats, &state.settings.base_url))
        .collect();

    Ok(Json(StatsListResponse {
        total: items.len(),
        items,
    }))
}
