//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` and render the same `{ "message", "errors"? }`
//! envelope used by successful responses.

use crate::news::FieldErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned to clients for any 5xx
const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Message returned for missing or invalid bearer tokens
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Record lookup or filter produced nothing
    #[error("{0}")]
    NotFound(String),

    /// One or more request fields failed validation
    #[error("{message}")]
    InvalidInput {
        /// Human-readable summary
        message: String,
        /// Field name -> violation messages
        errors: FieldErrors,
    },

    /// Missing, malformed or expired bearer token
    #[error("Unauthenticated: {0}")]
    Unauthorized(String),

    /// Store failure not otherwise classified
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a 404 with the given message
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    /// Build a 400 carrying field-level errors
    pub fn invalid_input(message: impl Into<String>, errors: FieldErrors) -> Self {
        AppError::InvalidInput {
            message: message.into(),
            errors,
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::NotFound(message) => json!({ "message": message }),
            AppError::InvalidInput { message, errors } => json!({
                "message": message,
                "errors": errors,
            }),
            AppError::Unauthorized(reason) => {
                tracing::debug!(%reason, "Rejected unauthenticated request");
                json!({ "message": UNAUTHENTICATED_MESSAGE })
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Store failure");
                json!({ "message": SERVER_ERROR_MESSAGE })
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                json!({ "message": SERVER_ERROR_MESSAGE })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Convert an unreadable request body into a validation failure
///
/// # Arguments
/// * `message` - Endpoint-specific validation message
/// * `reason` - Why the body was rejected
pub fn body_rejection(message: &str, reason: impl Into<String>) -> AppError {
    let mut errors = FieldErrors::default();
    errors.add("body", reason);
    AppError::invalid_input(message, errors)
}
