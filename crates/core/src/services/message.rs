//! Message service.

use std::sync::Arc;

use ballot_common::{AppError, AppResult, IdGenerator};
use ballot_db::{
    entities::message,
    repositories::{MessageRepository, ParticipantRepository},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use tracing::{debug, info};

/// Longest message a participant may leave.
pub const MAX_MESSAGE_LEN: usize = 5000;

/// Message service for business logic.
///
/// Each participant has at most one message. Messages are accepted whether
/// or not voting is open.
#[derive(Clone)]
pub struct MessageService {
    db: Arc<DatabaseConnection>,
    participant_repo: ParticipantRepository,
    message_repo: MessageRepository,
    id_gen: IdGenerator,
}

impl MessageService {
    /// Create a new message service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            participant_repo: ParticipantRepository::new(),
            message_repo: MessageRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Leave a message, replacing any earlier one by the same participant.
    pub async fn submit(&self, participant_id: &str, text: &str) -> AppResult<message::Model> {
        validate_text(text)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.participant_repo.get_by_id(&txn, participant_id).await?;
        let message = self.upsert(&txn, participant_id, text).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(participant_id = %participant_id, "Message saved");

        Ok(message)
    }

    async fn upsert(
        &self,
        txn: &DatabaseTransaction,
        participant_id: &str,
        text: &str,
    ) -> AppResult<message::Model> {
        if let Some(existing) = self
            .message_repo
            .find_by_participant(txn, participant_id)
            .await?
        {
            return self.message_repo.update_text(txn, existing, text).await;
        }

        let model = message::ActiveModel {
            id: Set(self.id_gen.generate()),
            participant_id: Set(participant_id.to_string()),
            text: Set(text.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let savepoint = txn
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match self.message_repo.create(&savepoint, model).await {
            Ok(message) => {
                savepoint
                    .commit()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(message)
            }
            Err(AppError::Conflict(detail)) => {
                savepoint
                    .rollback()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                debug!(detail = %detail, "Concurrent message insert, retrying as update");

                let existing = self
                    .message_repo
                    .find_by_participant(txn, participant_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!("Message conflict without a message: {detail}"))
                    })?;
                self.message_repo.update_text(txn, existing, text).await
            }
            Err(e) => Err(e),
        }
    }

    /// Get the message of a participant.
    pub async fn get(&self, participant_id: &str) -> AppResult<message::Model> {
        self.message_repo
            .find_by_participant(self.db.as_ref(), participant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message not found for: {participant_id}")))
    }

    /// List every message, newest first (admin).
    pub async fn list_all(&self) -> AppResult<Vec<message::Model>> {
        self.message_repo.find_all(self.db.as_ref()).await
    }
}

fn validate_text(text: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::Validation(format!(
            "Message is too long (max {MAX_MESSAGE_LEN} chars)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Happy anniversary!").is_ok());
        assert!(matches!(validate_text(""), Err(AppError::Validation(_))));
        assert!(matches!(validate_text(" \n\t"), Err(AppError::Validation(_))));
        assert!(validate_text(&"a".repeat(MAX_MESSAGE_LEN)).is_ok());
        assert!(validate_text(&"a".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }
}
