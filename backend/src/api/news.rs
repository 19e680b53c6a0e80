//! News API handlers
//!
//! Contains HTTP request handlers for news CRUD, title search and category filters.

use crate::api::extract::{BodyRejection, NewsBody};
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::news::validation::{validate, Presence};
use crate::news::{Category, NewsArticle, NewsId};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

/// Single article response
pub type NewsResponse = ApiResponse<NewsArticle>;

/// Article list response
pub type NewsListResponse = ApiResponse<Vec<NewsArticle>>;

const NEWS_NOT_FOUND: &str = "News not found";
const CREATE_INVALID: &str = "Invalid or incomplete data";
const UPDATE_INVALID: &str = "Incomplete data. Please fill in all required fields!";

/// Look up an article by its raw path id
///
/// Ids that are not integers cannot match any record.
async fn find_news(state: &AppState, raw_id: &str) -> Result<NewsArticle, AppError> {
    let id: NewsId = raw_id
        .parse()
        .map_err(|_| AppError::not_found(NEWS_NOT_FOUND))?;

    state
        .news
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(NEWS_NOT_FOUND))
}

/// GET /news - List all news
pub async fn list_news(State(state): State<AppState>) -> Result<Json<NewsListResponse>, AppError> {
    let news = state.news.list().await?;
    if news.is_empty() {
        return Err(AppError::not_found("No news found"));
    }

    Ok(Json(ApiResponse::new(
        "Successfully retrieved all news data",
        news,
    )))
}

/// GET /news/:id - Get a single news article
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NewsResponse>, AppError> {
    let news = find_news(&state, &id).await?;
    Ok(Json(ApiResponse::new("Successfully retrieved news data", news)))
}

/// POST /news - Create a news article
pub async fn create_news(
    State(state): State<AppState>,
    payload: Result<NewsBody, BodyRejection>,
) -> Result<(StatusCode, Json<NewsResponse>), AppError> {
    let NewsBody(payload) = payload.map_err(|r| r.into_error(CREATE_INVALID))?;

    let mut validation = validate(&payload, Presence::All);
    validation
        .check_unique_url(state.news.as_ref(), None)
        .await?;
    let fields = validation
        .into_fields()
        .map_err(|errors| AppError::invalid_input(CREATE_INVALID, errors))?;

    let news = state.news.create(&fields).await?;
    info!(news_id = news.id, "News created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("News successfully added", news)),
    ))
}

/// PUT /news/:id - Replace every field of a news article
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<NewsBody, BodyRejection>,
) -> Result<Json<NewsResponse>, AppError> {
    let existing = find_news(&state, &id).await?;
    let NewsBody(payload) = payload.map_err(|r| r.into_error(UPDATE_INVALID))?;

    let mut validation = validate(&payload, Presence::All);
    validation
        .check_unique_url(state.news.as_ref(), Some(existing.id))
        .await?;
    let fields = validation
        .into_fields()
        .map_err(|errors| AppError::invalid_input(UPDATE_INVALID, errors))?;

    let news = state
        .news
        .update(existing.id, &fields.into())
        .await?
        .ok_or_else(|| AppError::not_found(NEWS_NOT_FOUND))?;
    info!(news_id = news.id, "News updated");

    Ok(Json(ApiResponse::new("News data successfully updated", news)))
}

/// PATCH /news/:id - Update only the supplied fields
///
/// Unrecognized fields in the body are ignored; an empty body changes nothing.
pub async fn partial_update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<NewsBody, BodyRejection>,
) -> Result<Json<NewsResponse>, AppError> {
    let existing = find_news(&state, &id).await?;
    let NewsBody(payload) = payload.map_err(|r| r.into_error(UPDATE_INVALID))?;

    let mut validation = validate(&payload, Presence::Supplied);
    validation
        .check_unique_url(state.news.as_ref(), Some(existing.id))
        .await?;
    let changes = validation
        .into_changes()
        .map_err(|errors| AppError::invalid_input(UPDATE_INVALID, errors))?;

    let news = state
        .news
        .update(existing.id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found(NEWS_NOT_FOUND))?;
    info!(news_id = news.id, "News partially updated");

    Ok(Json(ApiResponse::new("News data partially updated", news)))
}

/// DELETE /news/:id - Delete a news article, returning its last state
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NewsResponse>, AppError> {
    let existing = find_news(&state, &id).await?;
    let news = state
        .news
        .delete(existing.id)
        .await?
        .ok_or_else(|| AppError::not_found(NEWS_NOT_FOUND))?;
    info!(news_id = news.id, "News deleted");

    Ok(Json(ApiResponse::new("News successfully deleted", news)))
}

/// GET /news/search/:title - Articles whose title contains the segment
pub async fn search_news(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<NewsListResponse>, AppError> {
    let news = state.news.find_by_title_substring(&title).await?;
    if news.is_empty() {
        return Err(AppError::not_found("No news found with that title"));
    }

    Ok(Json(ApiResponse::new(
        "Successfully retrieved news by title",
        news,
    )))
}

async fn news_in_category(
    state: &AppState,
    category: Category,
) -> Result<Json<NewsListResponse>, AppError> {
    let name = category.as_str();
    let news = state.news.find_by_category(name).await?;
    if news.is_empty() {
        return Err(AppError::not_found(format!(
            "No news found in the {} category",
            name
        )));
    }

    Ok(Json(ApiResponse::new(
        format!("Successfully retrieved {} news", name),
        news,
    )))
}

/// GET /news/category/sport
pub async fn sport_news(State(state): State<AppState>) -> Result<Json<NewsListResponse>, AppError> {
    news_in_category(&state, Category::Sport).await
}

/// GET /news/category/finance
pub async fn finance_news(
    State(state): State<AppState>,
) -> Result<Json<NewsListResponse>, AppError> {
    news_in_category(&state, Category::Finance).await
}

/// GET /news/category/automotive
pub async fn automotive_news(
    State(state): State<AppState>,
) -> Result<Json<NewsListResponse>, AppError> {
    news_in_category(&state, Category::Automotive).await
}
