// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
    ValidationError(String),
    MappingError(String),
    UnsupportedMediaType(String),
    PayloadTooLarge(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::MappingError(msg) => write!(f, "Mapping Error: {}", msg),
            ApiError::UnsupportedMediaType(msg) => write!(f, "Unsupported Media Type: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, "DUPLICATE"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
            ApiError::MappingError(msg) => (StatusCode::BAD_REQUEST, msg, "MAPPING_ERROR"),
            // Upload rejections stay in the 400 family so clients only branch on one status.
            ApiError::UnsupportedMediaType(msg) => {
                (StatusCode::BAD_REQUEST, msg, "UNSUPPORTED_MEDIA_TYPE")
            }
            ApiError::PayloadTooLarge(msg) => (StatusCode::BAD_REQUEST, msg, "PAYLOAD_TOO_LARGE"),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// True when a write failed on a UNIQUE constraint or unique index.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_foreign_key_violation()
                || db_err.message().contains("FOREIGN KEY constraint failed")
        }
        _ => false,
    }
}

/// Message of a database-level error, empty for other error kinds.
pub fn database_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        _ => String::new(),
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            ApiError::ValidationError(result.summary())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_taxonomy_status_codes() {
        let cases = vec![
            (ApiError::ValidationError("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ApiError::MappingError("x".into()), StatusCode::BAD_REQUEST, "MAPPING_ERROR"),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT, "DUPLICATE"),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                ApiError::UnsupportedMediaType("x".into()),
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_MEDIA_TYPE",
            ),
            (ApiError::PayloadTooLarge("x".into()), StatusCode::BAD_REQUEST, "PAYLOAD_TOO_LARGE"),
        ];

        for (err, status, code) in cases {
            let (actual_status, body) = render(err).await;
            assert_eq!(actual_status, status);
            assert_eq!(body["code"], code);
            assert_eq!(body["error"], "x");
        }
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let (status, body) = render(ApiError::DatabaseError(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database operation failed");
    }

    #[test]
    fn test_validation_result_conversion() {
        let mut result = ValidationResult::new();
        result.add_error("email", "Email is required");
        result.add_error("lastName", "Last name is required");

        match ApiError::from(result) {
            ApiError::ValidationError(msg) => {
                assert_eq!(msg, "email: Email is required, lastName: Last name is required")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
