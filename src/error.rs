//! Application error type and its HTTP mapping.
//!
//! Every variant renders as `{"detail": "<message>"}` with the matching status
//! code. `details` carries structured context for logs only and is never sent
//! to clients.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::unique_violation_constraint;

/// Message returned for unknown or expired tokens.
pub const URL_NOT_FOUND: &str = "URL not found";

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// The 404 used for tokens that are unknown or no longer active.
    pub fn url_not_found(token: &str) -> Self {
        Self::not_found(URL_NOT_FOUND, json!({ "token": token }))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            AppError::Internal { message, details } => {
                tracing::error!(%details, "{}", message);
                message
            }
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. } => message,
        };

        (status, Json(ErrorBody { detail: message })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(e.to_string(), json!({}))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text(), json!({}))
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(constraint) = unique_violation_constraint(&e) {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": constraint }),
        );
    }

    AppError::internal("Database error", json!({ "cause": e.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_renders_detail() {
        let response = AppError::url_not_found("abc123").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "detail": "URL not found" }));
    }

    #[tokio::test]
    async fn test_internal_hides_details() {
        let response = AppError::internal(
            "Database error",
            json!({ "cause": "password authentication failed" }),
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "detail": "Database error" }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("bad", json!({})).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::conflict("taken", json!({})).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::url_not_found("zzz");
        assert_eq!(err.to_string(), "URL not found");
    }

    #[test]
    fn test_non_database_sqlx_error_is_internal() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
