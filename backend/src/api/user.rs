//! Authenticated user endpoint

use crate::api::response::ApiResponse;
use crate::auth::AuthUser;
use axum::{response::Json, Extension};

/// GET /user - Identity of the bearer token holder
pub async fn current_user(Extension(user): Extension<AuthUser>) -> Json<ApiResponse<AuthUser>> {
    Json(ApiResponse::new(
        "Successfully retrieved authenticated user",
        user,
    ))
}
