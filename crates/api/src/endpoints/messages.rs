//! Message endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use ballot_common::AppResult;
use ballot_db::entities::message;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::AppState;

/// Message request.
#[derive(Debug, Deserialize, Validate)]
pub struct MessageRequest {
    #[validate(length(min = 1))]
    pub message_text: String,
}

/// Message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub user_id: String,
    pub message_text: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<message::Model> for MessageResponse {
    fn from(m: message::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.participant_id,
            message_text: m.text,
            created_at: m.created_at,
        }
    }
}

/// Leave or replace a message.
async fn submit(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> AppResult<Json<MessageResponse>> {
    req.validate()?;

    let message = state
        .message_service
        .submit(&user_id, &req.message_text)
        .await?;
    Ok(Json(message.into()))
}

/// Get a participant's message.
async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let message = state.message_service.get(&user_id).await?;
    Ok(Json(message.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(show).post(submit))
}
