//! API route configuration.

use crate::api::handlers::{shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link creation and statistics routes.
///
/// # Endpoints
///
/// - `POST /shorten`              - Create a short link
/// - `GET  /stats/{short_url}`    - View counter for a short link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{short_url}", get(stats_handler))
}
