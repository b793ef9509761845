//! Error handling for the lectern HTTP layer.
//!
//! Every failure surfaces as a status code plus a JSON body of the shape
//! `{"error": <string|mapping>}`; validation failures carry the per-field
//! message mapping, everything else a single message string.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Field name to list of human-readable violation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input; all violations collected per field.
    #[error("validation failed")]
    Validation { errors: FieldErrors },

    /// Pagination parameter outside its documented bounds.
    #[error("{message}")]
    InvalidParameter { message: String },

    /// Unknown record id.
    #[error("{message}")]
    NotFound { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create a validation error from collected field violations
    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation { errors }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, error_code, detail) = match self {
            ApiError::Validation { errors } => {
                (StatusCode::BAD_REQUEST, "validation_error", json!(errors))
            }
            ApiError::InvalidParameter { message } => {
                (StatusCode::BAD_REQUEST, "invalid_parameter", json!(message))
            }
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", json!(message)),
            ApiError::Internal(e) => {
                // Hide internal error details outside debug builds.
                let message = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    json!(message),
                )
            }
        };

        tracing::error!(
            error_id = %error_id,
            error_code = %error_code,
            status_code = %status.as_u16(),
            "Request error"
        );

        (status, Json(json!({ "error": detail }))).into_response()
    }
}
