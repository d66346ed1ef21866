use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more required request fields were absent. Not retryable.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The full fallback cascade found no eligible postings.
    #[error("Insufficient salary data for {specialty} in {location}")]
    InsufficientData { specialty: String, location: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Suggestion shown to the caller when no salary data could be found.
    pub fn insufficient_data_hint(specialty: &str, location: &str) -> String {
        format!(
            "Not enough salary data for {specialty} in {location}. \
             Try a different specialty or a broader location such as a state name."
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                "MISSING_FIELDS",
                format!("Missing required fields: {}", fields.join(", ")),
            ),
            AppError::InsufficientData {
                specialty,
                location,
            } => (
                StatusCode::NOT_FOUND,
                "INSUFFICIENT_DATA",
                AppError::insufficient_data_hint(specialty, location),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
