//! Routes for statement submission and listing.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, put},
};
use serde::Deserialize;
use tracing::{info, instrument};
use twotruths_game::domain::records::StatementSet;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /{session_id}/statements.
#[derive(Debug, Deserialize)]
pub struct UpsertStatementsRequest {
    /// Email of the submitting player.
    pub email: String,
    /// Display name at submission time.
    pub alias: String,
    /// First true statement.
    pub truth1: String,
    /// Second true statement.
    pub truth2: String,
    /// The lie.
    pub lie1: String,
}

/// PUT /{session_id}/statements
#[instrument(skip(state, request), fields(session_id = %session_id, email = %request.email))]
async fn upsert_statements(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<UpsertStatementsRequest>,
) -> Result<Json<StatementSet>, ApiError> {
    let set = state
        .repo
        .upsert_statements(
            &session_id,
            &request.email,
            &request.alias,
            &request.truth1,
            &request.truth2,
            &request.lie1,
        )
        .await?;
    info!("statements stored");
    Ok(Json(set))
}

/// GET /{session_id}/statements
#[instrument(skip(state))]
async fn list_statements(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<StatementSet>>, ApiError> {
    let statements = state.repo.list_statements(&session_id).await?;
    Ok(Json(statements))
}

/// Returns the router for statement submission.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{session_id}/statements",
        get(list_statements).put(upsert_statements),
    )
}
