//! Routes for session lifecycle: create, list, status, delete.
//!
//! Session-scoped subresources (statements, presentation, votes,
//! scores) are merged into this router so every game route lives
//! under one `/sessions` nest.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, put},
};
use serde::Deserialize;
use tracing::{info, instrument};
use twotruths_core::error::GameError;
use twotruths_game::domain::records::SessionStatus;
use twotruths_game::repository::{DeleteSessionOutcome, SessionEntry};

use crate::error::ApiError;
use crate::state::AppState;

use super::{presentation, scores, statements, votes};

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Email of the hosting player.
    pub host: String,
}

/// Request body for PUT /{session_id}/status.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// The status to declare.
    pub status: SessionStatus,
}

/// POST /
#[instrument(skip(state, request), fields(host = %request.host))]
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionEntry>, ApiError> {
    let entry = state
        .repo
        .create_session(&request.host, state.clock.as_ref())
        .await?;
    info!(session_id = %entry.session_id, "session created");
    Ok(Json(entry))
}

/// GET /
#[instrument(skip(state))]
async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<SessionEntry>>, ApiError> {
    let sessions = state.repo.list_sessions().await?;
    Ok(Json(sessions))
}

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionEntry>, ApiError> {
    let meta = state
        .repo
        .get_session(&session_id)
        .await?
        .ok_or_else(|| GameError::NotFound(format!("session {session_id}")))?;
    Ok(Json(SessionEntry { session_id, meta }))
}

/// PUT /{session_id}/status
#[instrument(skip(state, request), fields(session_id = %session_id))]
async fn set_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<SessionEntry>, ApiError> {
    let meta = state
        .repo
        .set_session_status(&session_id, request.status)
        .await?;
    info!("session status updated");
    Ok(Json(SessionEntry { session_id, meta }))
}

/// DELETE /{session_id}
#[instrument(skip(state))]
async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteSessionOutcome>, ApiError> {
    let outcome = state.repo.delete_session(&session_id).await?;
    info!(
        deleted = outcome.deleted,
        failed = outcome.errors.len(),
        "session deleted"
    );
    Ok(Json(outcome))
}

/// Returns the router for session lifecycle plus its subresources.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/{session_id}", get(get_session).delete(delete_session))
        .route("/{session_id}/status", put(set_session_status))
        .merge(statements::router())
        .merge(presentation::router())
        .merge(votes::router())
        .merge(scores::router())
}
