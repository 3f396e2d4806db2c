//! End-to-end tests against an in-process server.
//!
//! Each test binds the preview port itself, so the supervisor sees a
//! foreign listener and never spawns a dev server.

#![cfg(unix)]

use std::io::Cursor;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use forge_core::Coordinator;
use forge_llm::mock::{MockBackend, ScriptedReply};
use forge_llm::{Acquirer, FallbackPolicy, RetryPolicy};
use forge_preview::{PreviewConfig, PreviewSupervisor};
use forge_workspace::Materializer;
use tempfile::TempDir;

use forge_server::routes::build_router;
use forge_server::state::AppState;

const TAGGED_RESPONSE: &str = concat!(
    "<file name=\"index.html\"><!doctype html></file>",
    "<file name=\"src/main.jsx\">render()</file>",
    "<file name=\"package.json\">{}</file>",
);

struct TestServer {
    base_url: String,
    materializer: Arc<Materializer>,
    _workspace: TempDir,
    _port_guard: TcpListener,
}

async fn spawn_server(
    backend: MockBackend,
    policy: FallbackPolicy,
    min_interval: Duration,
) -> TestServer {
    let workspace = TempDir::new().unwrap();
    let port_guard = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let preview_port = port_guard.local_addr().unwrap().port();

    let retry = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        backoff_multiplier: 2.0,
    };
    let acquirer = Acquirer::new(Arc::new(backend))
        .with_retry_policy(retry)
        .with_fallback_policy(policy);

    let materializer = Arc::new(Materializer::new(workspace.path().join("generated")));
    let config = PreviewConfig::new(preview_port).with_install_command(vec!["true".into()]);
    let supervisor = PreviewSupervisor::new(materializer.root(), config);

    let coordinator = Arc::new(Coordinator::new(
        acquirer,
        Arc::clone(&materializer),
        supervisor,
        format!("http://localhost:{preview_port}"),
        min_interval,
    ));

    let state = AppState {
        coordinator,
        materializer: Arc::clone(&materializer),
        llm_configured: true,
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        materializer,
        _workspace: workspace,
        _port_guard: port_guard,
    }
}

async fn post_generate(server: &TestServer, prompt: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/generate", server.base_url))
        .json(&serde_json::json!({ "prompt": prompt }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn generate_materializes_files_and_returns_preview_url() {
    let backend = MockBackend::new().with_reply(ScriptedReply::text(TAGGED_RESPONSE));
    let server = spawn_server(backend, FallbackPolicy::SubstituteFallback, Duration::ZERO).await;

    let response = post_generate(&server, "a portfolio site").await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["previewUrl"].as_str().unwrap().starts_with("http://localhost:"));
    assert!(body.get("usedFallback").is_none());

    for name in ["index.html", "src/main.jsx", "package.json"] {
        assert!(server.materializer.read_file(name).is_ok(), "missing {name}");
    }
}

#[tokio::test]
async fn exhausted_backend_serves_fallback_with_note() {
    let backend = MockBackend::new().always_transient("overloaded");
    let server = spawn_server(backend, FallbackPolicy::SubstituteFallback, Duration::ZERO).await;

    let response = post_generate(&server, "anything").await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["usedFallback"], true);
    assert!(body["note"].as_str().is_some());
}

#[tokio::test]
async fn exhausted_backend_surfaces_500_under_propagate_policy() {
    let backend = MockBackend::new().always_transient("overloaded");
    let server = spawn_server(backend, FallbackPolicy::PropagateError, Duration::ZERO).await;

    let response = post_generate(&server, "anything").await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Generation failed");
    assert!(body["details"].as_str().is_some());
}

#[tokio::test]
async fn second_request_inside_the_interval_is_rejected() {
    let backend = MockBackend::new().with_reply(ScriptedReply::text(TAGGED_RESPONSE));
    let server = spawn_server(
        backend,
        FallbackPolicy::SubstituteFallback,
        Duration::from_secs(60),
    )
    .await;

    let first = post_generate(&server, "a portfolio").await;
    assert_eq!(first.status(), 200);

    let second = post_generate(&server, "a blog").await;
    assert_eq!(second.status(), 429);
    let body: serde_json::Value = second.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("too many requests"));
}

#[tokio::test]
async fn download_before_any_generation_is_an_error() {
    let backend = MockBackend::new();
    let server = spawn_server(backend, FallbackPolicy::SubstituteFallback, Duration::ZERO).await;

    let response = reqwest::get(format!("{}/download-zip", server.base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No files to download");
}

#[tokio::test]
async fn download_after_generation_yields_a_readable_archive() {
    let backend = MockBackend::new().with_reply(ScriptedReply::text(TAGGED_RESPONSE));
    let server = spawn_server(backend, FallbackPolicy::SubstituteFallback, Duration::ZERO).await;

    post_generate(&server, "a portfolio").await;

    let response = reqwest::get(format!("{}/download-zip", server.base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/zip"
    );
    let bytes = response.bytes().await.unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"index.html".to_string()));
    assert!(names.contains(&"src/main.jsx".to_string()));
}

#[tokio::test]
async fn health_reflects_pipeline_activity() {
    let backend = MockBackend::new().with_reply(ScriptedReply::text(TAGGED_RESPONSE));
    let server = spawn_server(backend, FallbackPolicy::SubstituteFallback, Duration::ZERO).await;

    let before: serde_json::Value = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before["cacheSize"], 0);
    assert_eq!(before["llmConfigured"], true);
    assert!(before["lastRequestAt"].is_null());

    post_generate(&server, "a portfolio").await;

    let after: serde_json::Value = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["cacheSize"], 1);
    assert!(after["lastRequestAt"].as_str().is_some());
}

#[tokio::test]
async fn preview_fallback_serves_workspace_files() {
    let backend = MockBackend::new().with_reply(ScriptedReply::text(TAGGED_RESPONSE));
    let server = spawn_server(backend, FallbackPolicy::SubstituteFallback, Duration::ZERO).await;

    post_generate(&server, "a portfolio").await;

    let index = reqwest::get(format!("{}/preview-fallback/", server.base_url))
        .await
        .unwrap();
    assert_eq!(index.status(), 200);
    assert_eq!(
        index.headers()["content-type"].to_str().unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(index.text().await.unwrap(), "<!doctype html>");

    let asset = reqwest::get(format!("{}/preview-fallback/src/main.jsx", server.base_url))
        .await
        .unwrap();
    assert_eq!(asset.status(), 200);
    assert_eq!(
        asset.headers()["content-type"].to_str().unwrap(),
        "text/javascript"
    );

    let missing = reqwest::get(format!("{}/preview-fallback/nope.css", server.base_url))
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}
