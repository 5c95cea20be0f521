//! HTTP handlers and wire types.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use research::{prompts, render, ChatTurn, Dashboard, RecordSource, StrainRecord};

use crate::state::AppState;

/// Strain search request: the typed query plus optional prior exchanges.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,

    #[serde(default, alias = "conversation_history")]
    pub conversation_history: Vec<ChatTurn>,
}

/// Strain search response: the structured record (when one was
/// produced), the chat-displayable text, where it came from, and the
/// card dashboard view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub record: Option<StrainRecord>,
    pub raw: String,
    pub source: RecordSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Dashboard>,
}

pub async fn strain_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    if request.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "query is required" })),
        )
            .into_response();
    }

    let outcome = state
        .researcher
        .research(&request.query, &request.conversation_history)
        .await;

    let dashboard = outcome.record.as_ref().map(render::dashboard);
    Json(SearchResponse {
        record: outcome.record,
        raw: outcome.raw,
        source: outcome.source,
        dashboard,
    })
    .into_response()
}

/// Image generation request: the current record's view-state, passed
/// explicitly with each request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    #[serde(default)]
    pub physical_characteristics: Vec<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub hybridization: Option<String>,
}

pub async fn generate_image(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Response {
    if request.physical_characteristics.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "physical characteristics are required"
            })),
        )
            .into_response();
    }

    let characteristics = request.physical_characteristics.join("; ");
    let prompt = prompts::format_image_prompt(
        &characteristics,
        request.name.as_deref(),
        request.hybridization.as_deref(),
    );

    match state.images.generate(&prompt).await {
        Ok(image) => Json(json!({
            "success": true,
            "image": image.data,
            "mime": image.mime,
        }))
        .into_response(),
        // Visible but non-blocking: the dashboard stays usable
        Err(e) => {
            warn!(error = %e, "image generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn health() -> &'static str {
    "OK"
}
