//! Participant endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use ballot_common::AppResult;
use ballot_db::entities::participant;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::AppState;

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Participant response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<participant::Model> for UserResponse {
    fn from(p: participant::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            created_at: p.created_at,
        }
    }
}

/// Register a new participant.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate()?;

    let participant = state.participant_service.register(&req.name).await?;
    Ok(Json(participant.into()))
}

/// Get a participant.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let participant = state.participant_service.get(&id).await?;
    Ok(Json(participant.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/{id}", get(show))
}
