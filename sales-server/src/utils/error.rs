//! Unified error handling
//!
//! Only two error kinds ever cross the service boundary:
//!
//! - [`AppError::NotFound`] — requested identifier absent (404, fixed message)
//! - [`AppError::Database`] / [`AppError::Internal`] — infrastructure failures
//!   (500, logged server-side, generic body)
//!
//! Malformed filter and sort inputs never become errors: they are normalized
//! to "absent" by the query layer. The one exception is `page`/`limit`, where
//! an explicitly invalid value is rejected with [`AppError::Validation`] (400)
//! instead of being silently defaulted.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Requested record does not exist (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request parameter (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type for handlers and services
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),

            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Invalid request",
                    "message": msg,
                })),
            )
                .into_response(),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": "Internal server error",
                        "message": "Database error",
                    })),
                )
                    .into_response()
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": "Internal server error",
                        "message": "Internal server error",
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl AppError {
    /// 404 with the fixed message the sales endpoints use
    pub fn sale_not_found() -> Self {
        Self::NotFound("Sale not found".to_string())
    }
}
