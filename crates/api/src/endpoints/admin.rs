//! Admin endpoints: results, messages and the voting window.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use ballot_common::AppResult;
use ballot_core::{OptionTally, QuestionTally, VotingStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::messages::MessageResponse;
use crate::middleware::AppState;

/// Vote count of one option.
#[derive(Debug, Serialize)]
pub struct VoteCountResponse {
    pub option_id: String,
    pub option_text: String,
    pub vote_count: i64,
}

impl From<OptionTally> for VoteCountResponse {
    fn from(t: OptionTally) -> Self {
        Self {
            option_id: t.option_id,
            option_text: t.option_text,
            vote_count: t.count,
        }
    }
}

/// Results of one question.
#[derive(Debug, Serialize)]
pub struct ActivityResultResponse {
    pub activity_id: String,
    pub question: String,
    pub order: i32,
    pub vote_counts: Vec<VoteCountResponse>,
    pub total_votes: i64,
}

impl From<QuestionTally> for ActivityResultResponse {
    fn from(t: QuestionTally) -> Self {
        Self {
            activity_id: t.question_id,
            question: t.question,
            order: t.order_key,
            vote_counts: t.vote_counts.into_iter().map(Into::into).collect(),
            total_votes: t.total_votes,
        }
    }
}

/// Voting window update.
#[derive(Debug, Deserialize)]
pub struct UpdateVotingRequest {
    pub is_closed: bool,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Results of every active question.
async fn results(State(state): State<AppState>) -> AppResult<Json<Vec<ActivityResultResponse>>> {
    let results = state.tally_service.all_results().await?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// Every message, newest first.
async fn messages(State(state): State<AppState>) -> AppResult<Json<Vec<MessageResponse>>> {
    let messages = state.message_service.list_all().await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Open, close or reschedule voting.
async fn update_voting(
    State(state): State<AppState>,
    Json(req): Json<UpdateVotingRequest>,
) -> AppResult<Json<VotingStatus>> {
    let status = state
        .voting_service
        .update_window(req.is_closed, req.end_time)
        .await?;
    Ok(Json(status))
}

/// Remove a participant with their votes and message.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.participant_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activities", get(results))
        .route("/messages", get(messages))
        .route("/voting", put(update_voting))
        .route("/users/{id}", delete(delete_user))
}
