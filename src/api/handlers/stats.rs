//! Handler for link view statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns how many times a short link has been followed.
///
/// # Endpoint
///
/// `GET /stats/{short_url}`
///
/// Expired links that have not been purged yet still report their counter.
///
/// # Errors
///
/// Returns 404 Not Found if the token is unknown.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(short_url): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let view_count = state.short_link_service.view_count(&short_url).await?;

    Ok(Json(StatsResponse {
        short_url,
        view_count,
    }))
}
