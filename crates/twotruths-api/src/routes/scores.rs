//! Routes for score records.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, put},
};
use serde::Deserialize;
use tracing::{info, instrument};
use twotruths_game::domain::keys;
use twotruths_game::domain::records::Score;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /{session_id}/scores.
#[derive(Debug, Deserialize)]
pub struct UpsertScoreRequest {
    /// Email of the scored voter.
    pub email: String,
    /// Correct-guess count to store.
    pub score: u32,
}

/// PUT /{session_id}/scores
#[instrument(skip(state, request), fields(session_id = %session_id, email = %request.email))]
async fn upsert_score(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<UpsertScoreRequest>,
) -> Result<Json<Score>, ApiError> {
    let score = state
        .repo
        .upsert_score(&session_id, &request.email, request.score)
        .await?;
    info!(score = score.score, "score stored");
    Ok(Json(score))
}

/// GET /{session_id}/scores/{email}
///
/// A voter with no score record reads as zero.
#[instrument(skip(state))]
async fn get_score(
    State(state): State<AppState>,
    Path((session_id, email)): Path<(String, String)>,
) -> Result<Json<Score>, ApiError> {
    let score = state.repo.get_score(&session_id, &email).await?;
    Ok(Json(Score {
        email: keys::normalize_email(&email),
        score,
    }))
}

/// GET /{session_id}/scores
#[instrument(skip(state))]
async fn list_scores(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Score>>, ApiError> {
    let scores = state.repo.list_scores(&session_id).await?;
    Ok(Json(scores))
}

/// Returns the router for score records.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{session_id}/scores", get(list_scores).put(upsert_score))
        .route("/{session_id}/scores/{email}", get(get_score))
}
