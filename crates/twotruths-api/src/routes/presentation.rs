//! Route for presentation creation.
//!
//! The response carries the target and the ordered statement texts
//! only; the lie's position stays server-side until the tally.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use twotruths_game::orchestration::{self, PresentationView};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{session_id}/presentation.
#[derive(Debug, Deserialize)]
pub struct CreatePresentationRequest {
    /// Email of the player whose statements are being presented.
    pub target: String,
}

/// POST /{session_id}/presentation
///
/// Draws a fresh shuffle on every call, replacing any stored order
/// for the target.
#[instrument(skip(state, request), fields(session_id = %session_id, target = %request.target))]
async fn create_presentation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<CreatePresentationRequest>,
) -> Result<Json<PresentationView>, ApiError> {
    orchestration::create_presentation(&state.repo, &state.rng, &session_id, &request.target)
        .await?;
    let view =
        orchestration::prepare_presentation(&state.repo, &session_id, &request.target).await?;
    info!("presentation created");
    Ok(Json(view))
}

/// Returns the router for presentation creation.
pub fn router() -> Router<AppState> {
    Router::new().route("/{session_id}/presentation", post(create_presentation))
}
