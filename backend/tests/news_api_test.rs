//! Integration tests for the news HTTP API
//!
//! These tests drive the full router (middleware included) against an
//! in-memory SQLite database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use news_api_backend::api;
use news_api_backend::config::Config;
use news_api_backend::news::NewsDb;
use news_api_backend::state::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create a router over a fresh in-memory database
async fn create_test_app() -> Router {
    let db = NewsDb::connect("sqlite::memory:", 1).await.unwrap();
    api::router(AppState::new(Arc::new(db), Config::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(body) => send_raw(app, method, uri, Some("application/json"), body.to_string()).await,
        None => send_raw(app, method, uri, None, String::new()).await,
    }
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn article(title: &str, url: &str, category: &str) -> Value {
    json!({
        "title": title,
        "author": "B",
        "description": "C",
        "content": "D",
        "url": url,
        "url_image": "http://x.test/i.png",
        "published_at": "2024-01-01",
        "category": category,
    })
}

async fn create(app: &Router, title: &str, url: &str, category: &str) -> Value {
    let (status, body) = send(app, Method::POST, "/news", Some(article(title, url, category))).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}

/// Create -> category filter -> delete -> lookup
#[tokio::test]
async fn test_article_lifecycle() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/news",
        Some(article("A", "http://x.test/1", "sport")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "News successfully added");
    assert_eq!(body["data"]["category"], "sport");
    assert_eq!(body["data"]["title"], "A");
    assert_eq!(body["data"]["author"], "B");
    assert_eq!(body["data"]["description"], "C");
    assert_eq!(body["data"]["content"], "D");
    assert_eq!(body["data"]["url"], "http://x.test/1");
    assert_eq!(body["data"]["url_image"], "http://x.test/i.png");
    assert_eq!(body["data"]["published_at"], "2024-01-01T00:00:00Z");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/news/category/sport", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully retrieved sport news");
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["id"].as_i64() == Some(id)));

    let (status, body) = send(&app, Method::DELETE, &format!("/news/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "News successfully deleted");
    assert_eq!(body["data"]["title"], "A");

    let (status, body) = send(&app, Method::GET, &format!("/news/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "News not found" }));

    let (status, _) = send(&app, Method::DELETE, &format!("/news/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_news() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/news", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "No news found" }));

    create(&app, "First", "http://x.test/1", "sport").await;
    create(&app, "Second", "http://x.test/2", "finance").await;

    let (status, body) = send(&app, Method::GET, "/news", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully retrieved all news data");
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn test_create_reports_all_field_errors() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/news",
        Some(json!({
            "title": "A",
            "url": "not-a-url",
            "url_image": "http://x.test/i.png",
            "published_at": "not-a-date",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or incomplete data");
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 6);
    assert_eq!(errors["author"], json!(["The author field is required."]));
    assert_eq!(errors["url"], json!(["The url field must be a valid URL."]));
    assert_eq!(
        errors["published_at"],
        json!(["The published at field must be a valid date."])
    );
    assert!(!errors.contains_key("title"));

    // Rejected writes never reach the store
    let (status, _) = send(&app, Method::GET, "/news", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_duplicate_url_rejected() {
    let app = create_test_app().await;
    create(&app, "A", "http://x.test/1", "sport").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/news",
        Some(article("B", "http://x.test/1", "sport")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["url"], json!(["The url has already been taken."]));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/news")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Invalid or incomplete data");
    assert!(body["errors"]["body"].is_array());
}

#[tokio::test]
async fn test_full_update() {
    let app = create_test_app().await;
    let created = create(&app, "A", "http://x.test/1", "sport").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/news/{}", id),
        Some(article("Renamed", "http://x.test/1", "automotive")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "News data successfully updated");
    assert_eq!(body["data"]["id"], created["id"]);
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["category"], "automotive");
    assert_eq!(body["data"]["created_at"], created["created_at"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/news/{}", id),
        Some(json!({ "title": "Only a title" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Incomplete data. Please fill in all required fields!"
    );
    assert_eq!(body["errors"].as_object().unwrap().len(), 7);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = create_test_app().await;

    for (method, body) in [
        (Method::PUT, article("A", "http://x.test/1", "sport")),
        (Method::PUT, json!({})),
        (Method::PATCH, json!({ "title": "x" })),
        (Method::PATCH, json!({ "url": "nope" })),
    ] {
        let (status, response) = send(&app, method, "/news/12345", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response, json!({ "message": "News not found" }));
    }

    let (status, _) = send(&app, Method::PATCH, "/news/not-an-id", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update_touches_only_supplied_fields() {
    let app = create_test_app().await;
    let created = create(&app, "A", "http://x.test/1", "sport").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/news/{}", id),
        Some(json!({ "title": "Patched", "views": 99, "id": 777 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "News data partially updated");

    let patched = &body["data"];
    assert_eq!(patched["title"], "Patched");
    assert_eq!(patched["id"], created["id"]);
    assert!(patched.get("views").is_none());
    for field in [
        "author",
        "description",
        "content",
        "url",
        "url_image",
        "published_at",
        "category",
        "created_at",
    ] {
        assert_eq!(patched[field], created[field], "{} changed", field);
    }

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/news/{}", id),
        Some(json!({ "url_image": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!({ "url_image": ["The url image field is required."] })
    );
}

#[tokio::test]
async fn test_partial_update_without_body_changes_nothing() {
    let app = create_test_app().await;
    let created = create(&app, "A", "http://x.test/1", "sport").await;
    let uri = format!("/news/{}", created["id"]);

    let (status, body) = send(&app, Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "News data partially updated");
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_form_encoded_writes() {
    let app = create_test_app().await;
    let form = "application/x-www-form-urlencoded";

    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/news",
        Some(form),
        "title=Grand+prix&author=B&description=C&content=D\
         &url=http%3A%2F%2Fx.test%2Fgp&url_image=http%3A%2F%2Fx.test%2Fgp.png\
         &published_at=2024-05-01+12%3A30%3A00&category=automotive"
            .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    let created = &body["data"];
    assert_eq!(created["title"], "Grand prix");
    assert_eq!(created["url"], "http://x.test/gp");
    assert_eq!(created["published_at"], "2024-05-01T12:30:00Z");

    let uri = format!("/news/{}", created["id"]);
    let (status, body) = send_raw(&app, Method::PATCH, &uri, Some(form), "category=sport".to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "sport");

    let (status, body) = send_raw(&app, Method::POST, "/news", Some(form), "title=Only".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or incomplete data");
    assert_eq!(body["errors"].as_object().unwrap().len(), 7);
}

#[tokio::test]
async fn test_non_string_url_is_invalid_url() {
    let app = create_test_app().await;
    let mut payload = article("A", "http://x.test/1", "sport");
    payload["url"] = json!(42);

    let (status, body) = send(&app, Method::POST, "/news", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!({ "url": ["The url field must be a valid URL."] }));
}

#[tokio::test]
async fn test_unknown_route_has_message_body() {
    let app = create_test_app().await;
    let (status, body) = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not Found" }));
}

#[tokio::test]
async fn test_partial_update_url_uniqueness() {
    let app = create_test_app().await;
    create(&app, "A", "http://x.test/1", "sport").await;
    let second = create(&app, "B", "http://x.test/2", "sport").await;
    let uri = format!("/news/{}", second["id"]);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "url": "http://x.test/2" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "url": "http://x.test/1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["url"], json!(["The url has already been taken."]));
}

#[tokio::test]
async fn test_search_by_title() {
    let app = create_test_app().await;
    create(&app, "Cup final tonight", "http://x.test/1", "sport").await;
    create(&app, "Markets rally", "http://x.test/2", "finance").await;

    let (status, body) = send(&app, Method::GET, "/news/search/final", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully retrieved news by title");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Cup final tonight");

    let (status, body) = send(&app, Method::GET, "/news/search/Cup%20final", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/news/search/weather", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "No news found with that title" }));
}

#[tokio::test]
async fn test_category_filters_exact_match() {
    let app = create_test_app().await;
    create(&app, "A", "http://x.test/1", "sport").await;
    create(&app, "B", "http://x.test/2", "Sport").await;
    create(&app, "C", "http://x.test/3", "finance").await;
    create(&app, "D", "http://x.test/4", "lifestyle").await;

    let (status, body) = send(&app, Method::GET, "/news/category/sport", None).await;
    assert_eq!(status, StatusCode::OK);
    let sport = body["data"].as_array().unwrap();
    assert_eq!(sport.len(), 1);
    assert!(sport.iter().all(|n| n["category"] == "sport"));

    let (status, body) = send(&app, Method::GET, "/news/category/finance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], "C");

    let (status, body) = send(&app, Method::GET, "/news/category/automotive", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "message": "No news found in the automotive category" })
    );
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
