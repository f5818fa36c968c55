//! JSON HTTP endpoints plus static asset serving.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use ds_core::{
    AnalysisSummary, RevealSet, analyze, compose_deep, compose_instant, compose_thinking, reveal,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;

pub struct AppState {
    rng: Mutex<SmallRng>,
}

impl AppState {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

type SharedState = Arc<AppState>;

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    query: Option<String>,
}

/// Parse a request body. An empty body is treated as `{}`.
fn parse_body(body: &[u8]) -> Result<QueryBody, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(QueryBody::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
}

fn require_query(body: &[u8]) -> Result<String, ApiError> {
    parse_body(body)?
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Query is required"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstantResponse {
    success: bool,
    query: String,
    analysis: &'static str,
    instant_messages: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeepResponse {
    success: bool,
    query: String,
    analysis: AnalysisSummary,
    deep_messages: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingResponse {
    success: bool,
    query: String,
    analysis: AnalysisSummary,
    thinking_messages: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ResultsResponse {
    success: bool,
    #[serde(flatten)]
    reveal: RevealSet,
}

async fn instant_check(body: Bytes) -> Result<Json<InstantResponse>, ApiError> {
    let query = require_query(&body)?;
    let instant_messages = compose_instant(&analyze(&query));
    tracing::info!(%query, messages = instant_messages.len(), "instant check");
    Ok(Json(InstantResponse {
        success: true,
        query,
        analysis: "Quick validation complete",
        instant_messages,
    }))
}

async fn deep_check(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<DeepResponse>, ApiError> {
    let query = require_query(&body)?;
    let features = analyze(&query);
    let deep_messages = compose_deep(&features, &mut *state.rng.lock().await);
    tracing::info!(%query, messages = deep_messages.len(), "deep check");
    Ok(Json(DeepResponse {
        success: true,
        analysis: AnalysisSummary::from_features(&features),
        query,
        deep_messages,
    }))
}

async fn legacy_search(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ThinkingResponse>, ApiError> {
    let query = require_query(&body)?;
    let features = analyze(&query);
    let thinking_messages = compose_thinking(&features, &mut *state.rng.lock().await);
    tracing::info!(%query, messages = thinking_messages.len(), "legacy search");
    Ok(Json(ThinkingResponse {
        success: true,
        analysis: AnalysisSummary::from_features(&features),
        query,
        thinking_messages,
    }))
}

async fn results(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ResultsResponse>, ApiError> {
    let query = parse_body(&body)?.query;
    let reveal = reveal(&mut *state.rng.lock().await);
    tracing::info!(query = query.as_deref().unwrap_or(""), "sending duck results");
    Ok(Json(ResultsResponse {
        success: true,
        reveal,
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub fn build_router(state: SharedState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/instant-check", post(instant_check))
        .route("/api/deep-check", post(deep_check))
        .route("/api/search", post(legacy_search))
        .route("/api/results", post(results))
        .route("/healthz", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::new(config.seed));
    let router = build_router(state, &config.server.static_dir);
    let addr = config.bind_addr();

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        %addr,
        static_dir = %config.server.static_dir.display(),
        "DuckSearch server listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server exited");
    Ok(())
}

/// Resolves when `listener` reports ctrl-c. A listener error is logged and
/// the future never resolves, leaving shutdown to the other signals.
async fn ctrl_c_received(listener: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = listener.await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = ctrl_c_received(signal::ctrl_c());
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body, body::Body, http::Request};
    use serde_json::Value;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router(static_dir: &Path) -> Router {
        build_router(Arc::new(AppState::new(Some(1))), static_dir)
    }

    async fn post_json(router: Router, uri: &str, payload: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_instant_check() {
        let dir = TempDir::new().unwrap();
        let (status, json) = post_json(
            test_router(dir.path()),
            "/api/instant-check",
            r#"{"query":"Where is the best apple?"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["analysis"], "Quick validation complete");
        assert_eq!(json["instantMessages"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_deep_check_analysis_shape() {
        let dir = TempDir::new().unwrap();
        let (status, json) = post_json(
            test_router(dir.path()),
            "/api/deep-check",
            r#"{"query":"Where is the best apple?"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["query"], "Where is the best apple?");
        assert_eq!(json["analysis"]["keywords"], "best, apple");
        assert_eq!(json["analysis"]["questionType"], "location");
        assert_eq!(json["analysis"]["topics"], "None");
        assert_eq!(json["analysis"]["ambiguous"], "apple");
        assert_eq!(json["analysis"]["modifiers"], "quality");
        assert_eq!(json["deepMessages"].as_array().unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_legacy_search() {
        let dir = TempDir::new().unwrap();
        let (status, json) = post_json(
            test_router(dir.path()),
            "/api/search",
            r#"{"query":"bank"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["thinkingMessages"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let dir = TempDir::new().unwrap();
        for uri in ["/api/instant-check", "/api/deep-check", "/api/search"] {
            for payload in ["{}", r#"{"query":"   "}"#, ""] {
                let (status, json) = post_json(test_router(dir.path()), uri, payload).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {payload:?}");
                assert_eq!(json["error"], "Query is required");
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let (status, json) =
            post_json(test_router(dir.path()), "/api/deep-check", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_results_without_query() {
        let dir = TempDir::new().unwrap();
        let (status, json) = post_json(test_router(dir.path()), "/api/results", "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["ducks"].as_array().unwrap().len(), 6);
        assert!(json["title"].is_string());
        assert!(json["message"].as_str().unwrap().contains("🦆"));
    }

    #[tokio::test]
    async fn test_ctrl_c_listener_error_does_not_trigger_shutdown() {
        let failing = async { Err(std::io::Error::other("no signal handler")) };
        let waited =
            tokio::time::timeout(Duration::from_millis(50), ctrl_c_received(failing)).await;
        assert!(waited.is_err());

        let received = async { Ok(()) };
        let waited =
            tokio::time::timeout(Duration::from_millis(50), ctrl_c_received(received)).await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_healthz() {
        let dir = TempDir::new().unwrap();
        let response = test_router(dir.path())
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>DuckSearch</h1>").unwrap();
        let response = test_router(dir.path())
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<h1>DuckSearch</h1>");
    }
}
