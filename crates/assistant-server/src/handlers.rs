//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agent_core::{ChatSession, SessionId, ToolSchema, Turn};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

impl From<&ChatSession> for TranscriptResponse {
    fn from(session: &ChatSession) -> Self {
        Self {
            session_id: session.id().to_string(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
            turns: session.transcript().turns().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn session_not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("No session with id {id}"),
            code: "SESSION_NOT_FOUND".into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model: state.agent.config().generation.model.clone(),
        provider_connected,
    })
}

/// Tools the model may call
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolSchema>> {
    Json(state.agent.tools().schemas())
}

/// Send one user message and get the assistant's reply.
///
/// Model failures come back as reply text with status 200, the same way the
/// transcript records them.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message must not be empty".into(),
                code: "EMPTY_MESSAGE".into(),
            }),
        ));
    }

    // Ids are only ever minted by the store
    let (id, session) = match payload.session_id {
        Some(id) => {
            let id = SessionId::from_string(id);
            let session = state
                .sessions
                .get(&id)
                .await
                .ok_or_else(|| session_not_found(&id.to_string()))?;
            (id, session)
        }
        None => state.sessions.create().await,
    };

    let reply = session.lock().await.send(&payload.message).await;

    Ok(Json(ChatResponse {
        message: reply,
        session_id: id.to_string(),
    }))
}

/// Full user/assistant transcript of a session
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let session = state
        .sessions
        .get(&SessionId::from_string(id.clone()))
        .await
        .ok_or_else(|| session_not_found(&id))?;

    let session = session.lock().await;
    Ok(Json(TranscriptResponse::from(&*session)))
}

/// Clear a session back to the greeting
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let session = state
        .sessions
        .get(&SessionId::from_string(id.clone()))
        .await
        .ok_or_else(|| session_not_found(&id))?;

    let mut session = session.lock().await;
    session.reset();
    Ok(Json(TranscriptResponse::from(&*session)))
}

/// End a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&SessionId::from_string(id.clone())).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&id))
    }
}
