//! JSON HTTP boundary around the engine.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/chat` | `{"message": "..."}` → `{"reply": "..."}` |
//! | `GET`  | `/health` | Health check (version, model, chunk count) |
//!
//! `/api/chat` always answers `200 OK` with a reply. An empty or
//! whitespace-only message short-circuits to [`NO_QUESTION_REPLY`] without
//! touching the engine; generation failures arrive as `"Error: ..."`
//! replies.
//!
//! All origins, methods, and headers are permitted so a browser chat page
//! served from elsewhere can call the API.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::Engine;

/// Reply sent when the request carries no question.
pub const NO_QUESTION_REPLY: &str = "No question provided.";

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

/// Build the router. Split from [`run_server`] so tests can bind it to an
/// ephemeral port.
pub fn router(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { engine })
}

/// Bind to `bind_addr` and serve until the process is terminated.
pub async fn run_server(bind_addr: &str, engine: Arc<Engine>) -> anyhow::Result<()> {
    let app = router(engine);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ============ POST /api/chat ============

/// `message` may be absent or `null`; both count as an empty question.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatReply> {
    let question = req.message.as_deref().unwrap_or_default().trim();
    if question.is_empty() {
        return Json(ChatReply {
            reply: NO_QUESTION_REPLY.to_string(),
        });
    }

    let reply = state.engine.answer(question).await;
    Json(ChatReply { reply })
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    model: String,
    chunks: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.engine.generator().model_name().to_string(),
        chunks: state.engine.corpus().len(),
    })
}
