//! Custom error types for the booking API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Custom error type for the booking API
///
/// Client-visible failures never carry stack traces or internal
/// identifiers; store and provider errors are logged and surfaced as a
/// generic 500.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input, surfaced per field
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Missing, invalid or expired session token
    #[error("unauthorized")]
    Unauthorized,

    /// Failed login. Unknown emails and wrong passwords share this
    /// variant so the response carries no account-enumeration signal.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Ownership or payment-metadata mismatch
    #[error("forbidden")]
    Forbidden,

    /// Missing resource
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Write conflicting with an existing record
    #[error("{0}")]
    Conflict(String),

    /// Payment transaction was not in the succeeded state
    #[error("Payment failed: {0}")]
    PaymentIncomplete(String),

    /// Store or provider failure; internal detail is logged, not surfaced
    #[error("upstream failure: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl ApiError {
    /// Convenience constructor for a single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": errors })),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Access denied" })),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid credentials" })),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Unauthorized" })),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{} not found", what) })),
            ),
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(json!({ "message": message })))
            }
            ApiError::PaymentIncomplete(status) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("Payment failed: {}", status) })),
            ),
            ApiError::Upstream(err) => {
                tracing::error!("upstream failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Something went wrong" })),
                )
            }
        };

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
