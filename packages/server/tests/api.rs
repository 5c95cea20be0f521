//! Handler tests: the three routes driven through `oneshot` with the
//! memory store and scripted providers.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use research::testing::{MockImageProvider, MockProvider};
use research::MemoryStore;
use server_core::app::build_app;
use server_core::state::AppState;

const REPORT: &str = "Strain Name: Blue Dream\nAlt Name(s): Azure Haze\nHybridization: Sativa-dominant Hybrid\n";

fn test_app(provider: MockProvider, images: MockImageProvider) -> Router {
    build_app(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(provider),
        Arc::new(images),
    ))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_app(MockProvider::new(), MockImageProvider::new());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_requires_a_query() {
    let app = test_app(MockProvider::new(), MockImageProvider::new());
    let (status, body) = post_json(app, "/api/strain-search", json!({ "query": "  " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "query is required");
}

#[tokio::test]
async fn search_returns_record_raw_source_and_dashboard() {
    let app = test_app(
        MockProvider::new().with_response(REPORT),
        MockImageProvider::new(),
    );
    let (status, body) = post_json(
        app,
        "/api/strain-search",
        json!({ "query": "blue dream", "conversationHistory": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "provider");
    assert_eq!(body["record"]["name"], "Blue Dream");
    assert_eq!(body["record"]["altNames"][0], "Azure Haze");
    assert_eq!(body["raw"], REPORT);
    assert_eq!(body["dashboard"]["cards"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn search_accepts_snake_case_history_alias() {
    let app = test_app(
        MockProvider::new().with_response(REPORT),
        MockImageProvider::new(),
    );
    let (status, _) = post_json(
        app,
        "/api/strain-search",
        json!({
            "query": "blue dream",
            "conversation_history": [
                { "role": "user", "content": "hi" },
                { "role": "assistant", "content": "hello" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn provider_failure_surfaces_as_a_fallback_chat_response() {
    let app = test_app(
        MockProvider::new().with_failure("HTTP 500"),
        MockImageProvider::new(),
    );
    let (status, body) = post_json(app, "/api/strain-search", json!({ "query": "runtz" })).await;

    // Degraded, not an error: the chat still gets a normal response
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert!(body["record"].is_null());
    assert!(body["raw"].as_str().unwrap().contains("strain database"));
}

#[tokio::test]
async fn image_generation_returns_base64_payload() {
    let app = test_app(
        MockProvider::new(),
        MockImageProvider::new().with_image("aGVsbG8=", "image/png"),
    );
    let (status, body) = post_json(
        app,
        "/api/generate-image",
        json!({
            "physicalCharacteristics": ["Dense green buds", "Milky trichomes"],
            "name": "Blue Dream",
            "hybridization": "Sativa-dominant Hybrid"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["image"], "aGVsbG8=");
    assert_eq!(body["mime"], "image/png");
}

#[tokio::test]
async fn image_generation_requires_characteristics() {
    let app = test_app(MockProvider::new(), MockImageProvider::new());
    let (status, body) = post_json(app, "/api/generate-image", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn image_failure_is_a_non_blocking_error_payload() {
    let app = test_app(MockProvider::new(), MockImageProvider::new());
    let (status, body) = post_json(
        app,
        "/api/generate-image",
        json!({ "physicalCharacteristics": ["Dense green buds"] }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some());
}
