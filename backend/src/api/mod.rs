//! API module
//!
//! Contains HTTP request handlers and the routing table.

pub mod extract;
pub mod news;
pub mod response;
pub mod user;

use crate::auth::auth_middleware;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state, Next},
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Build the application router
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | /news | [`news::list_news`] |
/// | POST | /news | [`news::create_news`] |
/// | GET | /news/:id | [`news::get_news`] |
/// | PUT | /news/:id | [`news::update_news`] |
/// | PATCH | /news/:id | [`news::partial_update_news`] |
/// | DELETE | /news/:id | [`news::delete_news`] |
/// | GET | /news/search/:title | [`news::search_news`] |
/// | GET | /news/category/sport | [`news::sport_news`] |
/// | GET | /news/category/finance | [`news::finance_news`] |
/// | GET | /news/category/automotive | [`news::automotive_news`] |
/// | GET | /user | [`user::current_user`] (bearer token) |
/// | GET | /health | liveness |
///
/// Any other path answers 404 with the usual `{ "message" }` body.
pub fn router(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/user", get(user::current_user))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/news", get(news::list_news).post(news::create_news))
        .route(
            "/news/:id",
            get(news::get_news)
                .put(news::update_news)
                .patch(news::partial_update_news)
                .delete(news::delete_news),
        )
        .route("/news/search/:title", get(news::search_news))
        .route("/news/category/sport", get(news::sport_news))
        .route("/news/category/finance", get(news::finance_news))
        .route("/news/category/automotive", get(news::automotive_news))
        .merge(authenticated)
        .fallback(route_not_found)
        // Middleware (order matters - request_id should be first)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

async fn route_not_found() -> AppError {
    AppError::not_found("Not Found")
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "News API is healthy".to_string(),
    })
}
