//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Bytes escaped when a stored URL is written into `Location`.
///
/// Non-ASCII bytes are always escaped. `%` is left alone so URLs that are
/// already encoded pass through unchanged.
const LOCATION_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Redirects a short token to its original URL.
///
/// # Endpoint
///
/// `GET /{short_url}`
///
/// # Request Flow
///
/// 1. Look up the token among active links
/// 2. Percent-encode the stored URL into a `Location` header
/// 3. Increment its view counter (a failure does not block the redirect)
/// 4. Return 301 Moved Permanently
///
/// # Errors
///
/// Returns 404 Not Found if the token is unknown or expired.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let service = &state.short_link_service;

    let link = service.find_active(&short_url).await?;
    let location = location_header(&link.long_url).map_err(|_| {
        AppError::internal(
            "Stored URL cannot be used as a redirect target",
            json!({ "token": short_url }),
        )
    })?;

    service.record_view(&short_url).await;

    debug!(token = %short_url, "Redirecting");

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// Builds a `Location` value from arbitrary stored URL text.
pub fn location_header(
    long_url: &str,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let encoded = utf8_percent_encode(long_url, LOCATION_ESCAPES).to_string();
    HeaderValue::try_from(encoded)
}
