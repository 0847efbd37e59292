//! Routes for user registration and lookup.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, instrument};
use twotruths_core::error::GameError;
use twotruths_game::domain::records::UserRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    /// The user's email address; case-folded before storage.
    pub email: String,
    /// Display name.
    pub alias: String,
}

/// POST /
#[instrument(skip(state, request), fields(email = %request.email))]
async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    info!("handling register_user");
    let user = state.repo.upsert_user(&request.email, &request.alias).await?;
    Ok(Json(user))
}

/// GET /{email}
#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    let user = state
        .repo
        .get_user(&email)
        .await?
        .ok_or_else(|| GameError::NotFound(format!("user {email}")))?;
    Ok(Json(user))
}

/// Returns the router for user registration.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/{email}", get(get_user))
}
