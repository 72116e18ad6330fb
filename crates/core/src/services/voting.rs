//! Voting service: the voting gate and vote submission.

use std::sync::Arc;

use ballot_common::{AppError, AppResult, IdGenerator};
use ballot_db::{
    entities::{vote, voting_config},
    repositories::{
        ParticipantRepository, QuestionOptionRepository, QuestionRepository, VoteRepository,
        VotingConfigRepository,
    },
};
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info};

/// Whether votes are accepted at `now` under `config`.
///
/// A missing config row means the system was never closed, so voting is open.
#[must_use]
pub fn is_open(config: Option<&voting_config::Model>, now: DateTime<Utc>) -> bool {
    let Some(config) = config else {
        return true;
    };
    if config.is_closed {
        return false;
    }
    if let Some(end_time) = config.end_time
        && now >= end_time
    {
        return false;
    }
    true
}

/// Current state of the voting window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VotingStatus {
    pub is_voting_open: bool,
    pub voting_end_time: Option<DateTime<FixedOffset>>,
}

/// Voting service for business logic.
#[derive(Clone)]
pub struct VotingService {
    db: Arc<DatabaseConnection>,
    participant_repo: ParticipantRepository,
    question_repo: QuestionRepository,
    option_repo: QuestionOptionRepository,
    vote_repo: VoteRepository,
    config_repo: VotingConfigRepository,
    id_gen: IdGenerator,
}

impl VotingService {
    /// Create a new voting service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            participant_repo: ParticipantRepository::new(),
            question_repo: QuestionRepository::new(),
            option_repo: QuestionOptionRepository::new(),
            vote_repo: VoteRepository::new(),
            config_repo: VotingConfigRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Read the gate from the current config row.
    pub async fn is_voting_open(&self) -> AppResult<bool> {
        let config = self.config_repo.find(self.db.as_ref()).await?;
        Ok(is_open(config.as_ref(), Utc::now()))
    }

    /// Get the voting window as shown to participants.
    pub async fn status(&self) -> AppResult<VotingStatus> {
        let config = self.config_repo.find(self.db.as_ref()).await?;
        Ok(VotingStatus {
            is_voting_open: is_open(config.as_ref(), Utc::now()),
            voting_end_time: config.and_then(|c| c.end_time),
        })
    }

    /// Record a participant's choice for a question.
    ///
    /// A participant holds one vote per question; voting again moves that
    /// vote to the new option and keeps its original `created_at`.
    pub async fn submit_vote(
        &self,
        participant_id: &str,
        question_id: &str,
        option_id: &str,
    ) -> AppResult<vote::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let config = self.config_repo.find(&txn).await?;
        if !is_open(config.as_ref(), Utc::now()) {
            return Err(AppError::VotingClosed);
        }

        self.participant_repo.get_by_id(&txn, participant_id).await?;
        self.question_repo.get_by_id(&txn, question_id).await?;
        if self
            .option_repo
            .find_in_question(&txn, question_id, option_id)
            .await?
            .is_none()
        {
            return Err(AppError::InvalidReference(format!(
                "Option {option_id} does not belong to question {question_id}"
            )));
        }

        let vote = self
            .upsert(&txn, participant_id, question_id, option_id)
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            participant_id = %participant_id,
            question_id = %question_id,
            option_id = %option_id,
            "Vote recorded"
        );

        Ok(vote)
    }

    async fn upsert(
        &self,
        txn: &DatabaseTransaction,
        participant_id: &str,
        question_id: &str,
        option_id: &str,
    ) -> AppResult<vote::Model> {
        if let Some(existing) = self
            .vote_repo
            .find_by_participant_and_question(txn, participant_id, question_id)
            .await?
        {
            return self.vote_repo.update_option(txn, existing, option_id).await;
        }

        let model = vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            participant_id: Set(participant_id.to_string()),
            question_id: Set(question_id.to_string()),
            option_id: Set(option_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        // Savepoint, so a failed insert leaves the outer transaction usable
        let savepoint = txn
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match self.vote_repo.create(&savepoint, model).await {
            Ok(vote) => {
                savepoint
                    .commit()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(vote)
            }
            Err(AppError::Conflict(detail)) => {
                savepoint
                    .rollback()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                debug!(detail = %detail, "Concurrent vote insert, retrying as update");

                let existing = self
                    .vote_repo
                    .find_by_participant_and_question(txn, participant_id, question_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!("Vote conflict without a vote: {detail}"))
                    })?;
                self.vote_repo.update_option(txn, existing, option_id).await
            }
            Err(e) => Err(e),
        }
    }

    /// Get all votes of a participant.
    pub async fn votes_for(&self, participant_id: &str) -> AppResult<Vec<vote::Model>> {
        self.vote_repo
            .find_by_participant(self.db.as_ref(), participant_id)
            .await
    }

    /// Open, close or reschedule the voting window (admin).
    pub async fn update_window(
        &self,
        is_closed: bool,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<VotingStatus> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.config_repo.get_or_create(&txn).await?;
        let config = self.config_repo.update(&txn, is_closed, end_time).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(is_closed, end_time = ?end_time, "Voting window updated");

        Ok(VotingStatus {
            is_voting_open: is_open(Some(&config), Utc::now()),
            voting_end_time: config.end_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_db::entities::voting_config::VOTING_CONFIG_ID;
    use chrono::Duration;

    fn config(is_closed: bool, end_time: Option<DateTime<Utc>>) -> voting_config::Model {
        voting_config::Model {
            id: VOTING_CONFIG_ID.to_string(),
            is_closed,
            end_time: end_time.map(Into::into),
        }
    }

    #[test]
    fn test_missing_config_is_open() {
        assert!(is_open(None, Utc::now()));
    }

    #[test]
    fn test_closed_flag_wins_over_future_deadline() {
        let now = Utc::now();
        let cfg = config(true, Some(now + Duration::hours(1)));
        assert!(!is_open(Some(&cfg), now));
    }

    #[test]
    fn test_past_deadline_is_closed() {
        let now = Utc::now();
        let cfg = config(false, Some(now - Duration::minutes(1)));
        assert!(!is_open(Some(&cfg), now));
    }

    #[test]
    fn test_deadline_is_exclusive() {
        let now = Utc::now();
        let cfg = config(false, Some(now));
        assert!(!is_open(Some(&cfg), now));
        assert!(is_open(Some(&cfg), now - Duration::seconds(1)));
    }

    #[test]
    fn test_future_deadline_is_open() {
        let now = Utc::now();
        let cfg = config(false, Some(now + Duration::days(1)));
        assert!(is_open(Some(&cfg), now));
        assert!(is_open(Some(&config(false, None)), now));
    }
}
