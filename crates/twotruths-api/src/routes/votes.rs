//! Routes for vote casting, listing, and the reveal tally.

use axum::extract::{Path, Query, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, instrument};
use twotruths_game::domain::records::Vote;
use twotruths_game::orchestration::{self, TallyOutcome};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{session_id}/votes.
#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    /// Email of the voting player.
    pub voter: String,
    /// Email of the player being voted on.
    pub target: String,
    /// 1-based position believed to hold the lie.
    pub chosen_index: u8,
}

/// Query parameters for GET /{session_id}/votes.
#[derive(Debug, Deserialize)]
pub struct VotesQuery {
    /// Email of the player whose votes to list.
    pub target: String,
}

/// Request body for POST /{session_id}/tally.
#[derive(Debug, Deserialize)]
pub struct TallyRequest {
    /// Email of the player whose votes to tally.
    pub target: String,
}

/// POST /{session_id}/votes
#[instrument(
    skip(state, request),
    fields(session_id = %session_id, voter = %request.voter, target = %request.target)
)]
async fn cast_vote(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<CastVoteRequest>,
) -> Result<Json<Vote>, ApiError> {
    let vote = orchestration::cast_vote(
        &state.repo,
        &session_id,
        &request.voter,
        &request.target,
        request.chosen_index,
    )
    .await?;
    info!(choice = vote.choice, "vote cast");
    Ok(Json(vote))
}

/// GET /{session_id}/votes?target=
#[instrument(skip(state, query), fields(session_id = %session_id, target = %query.target))]
async fn list_votes(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<VotesQuery>,
) -> Result<Json<Vec<Vote>>, ApiError> {
    let votes = state
        .repo
        .list_votes_for_target(&session_id, &query.target)
        .await?;
    Ok(Json(votes))
}

/// POST /{session_id}/tally
///
/// Reveals the lie and credits correct voters. Scores are written on
/// every invocation; repeating the tally repeats the credit.
#[instrument(skip(state, request), fields(session_id = %session_id, target = %request.target))]
async fn tally_target(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<TallyRequest>,
) -> Result<Json<TallyOutcome>, ApiError> {
    let outcome = orchestration::tally_target(&state.repo, &session_id, &request.target).await?;
    info!(votes = outcome.results.len(), "target tallied");
    Ok(Json(outcome))
}

/// Returns the router for voting and tallying.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{session_id}/votes", get(list_votes).post(cast_vote))
        .route("/{session_id}/tally", post(tally_target))
}
