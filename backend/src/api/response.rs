//! Response envelope
//!
//! Every endpoint answers with `{ "message": ..., "data"?: ... }`. Errors use the
//! same shape, see [`crate::error::AppError`].

use serde::Serialize;

/// Uniform JSON response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Human-readable message
    pub message: String,
    /// Payload (single article, list of articles, user)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Response carrying `data`
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}
