//! Voting endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use ballot_common::AppResult;
use ballot_core::VotingStatus;
use ballot_db::{
    entities::{question_option, vote},
    repositories::QuestionWithOptions,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::middleware::AppState;

/// Option as shown on the ballot.
#[derive(Debug, Serialize)]
pub struct OptionResponse {
    pub id: String,
    pub option_text: String,
    pub order: i32,
}

impl From<question_option::Model> for OptionResponse {
    fn from(o: question_option::Model) -> Self {
        Self {
            id: o.id,
            option_text: o.text,
            order: o.order_key,
        }
    }
}

/// Question with its options.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: String,
    pub question: String,
    pub order: i32,
    pub options: Vec<OptionResponse>,
}

impl From<QuestionWithOptions> for ActivityResponse {
    fn from(q: QuestionWithOptions) -> Self {
        Self {
            id: q.question.id,
            question: q.question.text,
            order: q.question.order_key,
            options: q.options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Vote request.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub activity_id: String,
    pub option_id: String,
}

/// Vote response.
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub id: String,
    pub user_id: String,
    pub activity_id: String,
    pub option_id: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<vote::Model> for VoteResponse {
    fn from(v: vote::Model) -> Self {
        Self {
            id: v.id,
            user_id: v.participant_id,
            activity_id: v.question_id,
            option_id: v.option_id,
            created_at: v.created_at,
        }
    }
}

/// Get the voting window.
async fn status(State(state): State<AppState>) -> AppResult<Json<VotingStatus>> {
    Ok(Json(state.voting_service.status().await?))
}

/// List active questions.
async fn list_activities(State(state): State<AppState>) -> AppResult<Json<Vec<ActivityResponse>>> {
    let questions = state.question_service.list_active().await?;
    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// Get one question.
async fn show_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActivityResponse>> {
    let question = state.question_service.get(&id).await?;
    Ok(Json(question.into()))
}

/// Cast or change a vote.
async fn vote(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> AppResult<Json<VoteResponse>> {
    let vote = state
        .voting_service
        .submit_vote(&user_id, &req.activity_id, &req.option_id)
        .await?;
    Ok(Json(vote.into()))
}

/// List a participant's votes.
async fn user_votes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<VoteResponse>>> {
    let votes = state.voting_service.votes_for(&user_id).await?;
    Ok(Json(votes.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/activities", get(list_activities))
        .route("/activities/{id}", get(show_activity))
        .route("/vote/{user_id}", post(vote))
        .route("/user-votes/{user_id}", get(user_votes))
}
