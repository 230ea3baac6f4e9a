//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::{DuelError, DuelSnapshot};
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .route("/duel", get(snapshot_handler).post(start_handler))
        .route("/duel/reset", post(reset_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.client_origin))
        .with_state(state)
}

/// CORS configuration - support multiple origins (comma-separated in CLIENT_ORIGIN)
fn cors_layer(client_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if client_origin.trim() == "*" {
        return cors.allow_origin(Any);
    }

    let allowed_origins: Vec<HeaderValue> = client_origin
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    cors.allow_origin(allowed_origins)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    duel_running: bool,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        duel_running: state.orchestrator.is_running(),
    })
}

// ============================================================================
// Duel endpoints
// ============================================================================

#[derive(Deserialize)]
struct StartDuelRequest {
    names: Vec<String>,
}

#[derive(Serialize)]
struct StartDuelResponse {
    game_id: Uuid,
    snapshot: Option<DuelSnapshot>,
}

async fn start_handler(
    State(state): State<AppState>,
    Json(req): Json<StartDuelRequest>,
) -> Result<Json<StartDuelResponse>, AppError> {
    let game_id = state.orchestrator.start(&req.names)?;

    Ok(Json(StartDuelResponse {
        game_id,
        snapshot: state.orchestrator.snapshot(),
    }))
}

async fn snapshot_handler(State(state): State<AppState>) -> Result<Json<DuelSnapshot>, AppError> {
    state
        .orchestrator
        .snapshot()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No duel in progress".to_string()))
}

async fn reset_handler(State(state): State<AppState>) -> StatusCode {
    state.orchestrator.reset();
    StatusCode::NO_CONTENT
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<DuelError> for AppError {
    fn from(err: DuelError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
