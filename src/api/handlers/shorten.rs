//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "http://example.com",
///   "expiration_date": "2024-12-31T00:00:00"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": 1,
///   "url": "http://example.com",
///   "short_url": "aZ3k9Q",
///   "expiration_date": "2024-12-31T00:00:00"
/// }
/// ```
///
/// # Errors
///
/// Returns 422 Unprocessable Entity if the body is malformed or fails validation.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .short_link_service
        .create_short_link(payload.url, payload.expiration_date)
        .await?;

    Ok(Json(link.into()))
}
