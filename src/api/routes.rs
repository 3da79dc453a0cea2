//! Axum routes for the honeypot API.
//!
//! Thin plumbing around the orchestrator: pre-shared-key auth, envelope
//! validation, and JSON shaping. Core logic never runs for unauthorized or
//! malformed requests.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::engage::Orchestrator;
use crate::error::SessionError;

use super::types::{MessageEvent, MessageResponse};

/// Header carrying the pre-shared key.
const API_KEY_HEADER: &str = "x-api-key";

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub api_key: SecretString,
}

/// Errors surfaced to API callers as JSON.
enum ApiError {
    Unauthorized,
    NotFound(String),
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid API key".to_string()),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
            Self::Conflict(m) => (StatusCode::CONFLICT, m),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound { .. } => Self::NotFound("Session not found".into()),
            SessionError::AlreadyTerminated { .. } => {
                Self::Conflict("Session already terminated".into())
            }
        }
    }
}

/// Check the pre-shared key before the core is invoked.
fn authorize(headers: &HeaderMap, expected: &SecretString) -> Result<(), ApiError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if presented == expected.expose_secret() {
        Ok(())
    } else {
        warn!("Rejected request with missing or invalid API key");
        Err(ApiError::Unauthorized)
    }
}

/// Build the honeypot router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/v1/health", get(health))
        .route("/api/v1/message", post(process_message))
        .route("/api/v1/cleanup", post(cleanup))
        .route(
            "/api/v1/session/{id}",
            get(get_session).delete(end_session),
        )
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "scamtrap",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational"
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "active_sessions": state.orchestrator.active_sessions().await
    }))
}

/// POST /api/v1/message — the single `processMessage` entry point.
async fn process_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<MessageEvent>,
) -> Result<Json<MessageResponse>, ApiError> {
    authorize(&headers, &state.api_key)?;

    if let Some(meta) = &event.metadata {
        debug!(session_id = %event.session_id, metadata = %meta, "Message metadata");
    }

    let outcome = state
        .orchestrator
        .process_message(&event.session_id, &event.message, event.timestamp)
        .await;

    Ok(Json(outcome.into()))
}

/// POST /api/v1/cleanup — manual idle sweep.
async fn cleanup(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&headers, &state.api_key)?;

    let swept = state.orchestrator.sweep_idle().await;
    Ok(Json(serde_json::json!({
        "status": "success",
        "swept": swept,
        "active_sessions": state.orchestrator.active_sessions().await
    })))
}

/// GET /api/v1/session/{id} — session snapshot.
async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    authorize(&headers, &state.api_key)?;

    let session = state.orchestrator.session_snapshot(&id).await?;
    Ok(Json(session).into_response())
}

/// DELETE /api/v1/session/{id} — manually end a session (triggers the
/// terminal callback).
async fn end_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&headers, &state.api_key)?;

    state.orchestrator.end_session(&id).await?;
    Ok(Json(serde_json::json!({
        "message": "Session ended",
        "sessionId": id
    })))
}
