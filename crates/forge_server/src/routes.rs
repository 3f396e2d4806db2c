//! HTTP surface: generate, download, static preview fallback, health.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use forge_core::{CoreError, GenerationOutcome, GenerationRequest};
use forge_workspace::{archive, WorkspaceError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/download-zip", get(download_zip))
        .route("/preview-fallback", get(preview_index))
        .route("/preview-fallback/", get(preview_index))
        .route("/preview-fallback/{*path}", get(preview_asset))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    success: bool,
    preview_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    used_fallback: bool,
    #[serde(skip_serializing_if = "is_false")]
    cached: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            success: true,
            preview_url: outcome.preview_url,
            note: outcome.note,
            used_fallback: outcome.used_fallback,
            cached: outcome.cached,
        }
    }
}

async fn generate(State(state): State<AppState>, Json(body): Json<GenerateBody>) -> Response {
    match state
        .coordinator
        .handle(GenerationRequest::new(body.prompt))
        .await
    {
        Ok(outcome) => Json(GenerateResponse::from(outcome)).into_response(),
        Err(err @ CoreError::RateLimited { .. }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "generation pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Generation failed", "details": err.to_string() })),
            )
                .into_response()
        }
    }
}

async fn download_zip(State(state): State<AppState>) -> Response {
    match archive::zip_to_bytes(state.materializer.root()) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/zip"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"siteforge-project.zip\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(WorkspaceError::Empty) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "No files to download" })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to archive workspace");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to build archive", "details": err.to_string() })),
            )
                .into_response()
        }
    }
}

async fn preview_index(State(state): State<AppState>) -> Response {
    serve_workspace_file(&state, "index.html")
}

async fn preview_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve_workspace_file(&state, &path)
}

fn serve_workspace_file(state: &AppState, relative: &str) -> Response {
    match state.materializer.read_file(relative) {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, content_type_for(relative))],
            bytes,
        )
            .into_response(),
        Err(WorkspaceError::UnsafePath(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid path" })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not found" })),
        )
            .into_response(),
    }
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or_default() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" | "jsx" | "ts" | "tsx" => "text/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "txt" | "md" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    cache_size: usize,
    llm_configured: bool,
    last_request_at: Option<String>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        cache_size: state.coordinator.cache_size(),
        llm_configured: state.llm_configured,
        last_request_at: state
            .coordinator
            .last_request_at()
            .map(|at| at.to_rfc3339()),
    })
}
