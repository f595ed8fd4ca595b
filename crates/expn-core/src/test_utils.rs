//! Test utilities for expn-core
//!
//! This module provides a mock Gemini server that speaks just enough of the
//! `generateContent` API for integration tests and local development, plus a
//! bare HTTP server for backend tests that bring their own routes.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock server answers generate requests
#[derive(Debug, Clone)]
pub enum MockMode {
    /// One candidate with this text
    Reply(String),
    /// 200 OK with no candidates
    Empty,
    /// Error status with a Google-style error body
    Status(u16),
    /// 200 OK with a body that is not JSON
    Malformed,
}

/// A generate request as received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Last path segment, e.g. `gemini-1.5-pro:generateContent`
    pub model_call: String,
    /// Value of the `x-goog-api-key` header
    pub api_key: Option<String>,
    /// Parsed JSON body (Null if it was not JSON)
    pub body: Value,
}

struct ServerState {
    mode: MockMode,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// HTTP server on an ephemeral port serving any router
///
/// Used directly by backend tests that only need a route or two, and by
/// [`MockGeminiServer`].
pub struct MockHttpServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockHttpServer {
    /// Start serving `app` on an available port
    pub async fn start(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    server: MockHttpServer,
    state: Arc<ServerState>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start(mode: MockMode) -> Self {
        let state = Arc::new(ServerState {
            mode,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(
                "/v1beta/models/:call",
                get(handle_model).post(handle_generate),
            )
            .with_state(state.clone());

        Self {
            server: MockHttpServer::start(app).await,
            state,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Generate requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.server.stop();
    }
}

/// Model metadata endpoint (health check)
async fn handle_model(
    State(state): State<Arc<ServerState>>,
    Path(model): Path<String>,
) -> Response {
    if let MockMode::Status(code) = state.mode {
        return error_response(code);
    }
    Json(json!({
        "name": format!("models/{}", model),
        "displayName": model,
        "supportedGenerationMethods": ["generateContent"],
    }))
    .into_response()
}

/// generateContent endpoint
async fn handle_generate(
    State(state): State<Arc<ServerState>>,
    Path(call): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        model_call: call,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    match &state.mode {
        MockMode::Reply(text) => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP",
            }],
        }))
        .into_response(),
        MockMode::Empty => Json(json!({ "candidates": [] })).into_response(),
        MockMode::Status(code) => error_response(*code),
        MockMode::Malformed => (StatusCode::OK, "<html>upstream proxy error</html>").into_response(),
    }
}

fn error_response(code: u16) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let reason = match code {
        400 => "INVALID_ARGUMENT",
        401 => "UNAUTHENTICATED",
        403 => "PERMISSION_DENIED",
        429 => "RESOURCE_EXHAUSTED",
        _ => "INTERNAL",
    };
    (
        status,
        Json(json!({
            "error": {
                "code": code,
                "message": format!("mock failure ({})", reason),
                "status": reason,
            }
        })),
    )
        .into_response()
}
