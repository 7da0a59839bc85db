//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`             - Create a short link
//! - `GET  /stats/{short_url}`   - View counter
//! - `GET  /health`              - Health check
//! - `GET  /{short_url}`         - Short link redirect
//!
//! Static segments win over the `{short_url}` capture, which is why the
//! generator never issues tokens equal to a static segment.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with request tracing, before path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{short_url}", get(redirect_handler))
        .merge(api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
