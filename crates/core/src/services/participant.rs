//! Participant service.

use std::sync::Arc;

use ballot_common::{AppError, AppResult, IdGenerator};
use ballot_db::{entities::participant, repositories::ParticipantRepository};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use tracing::info;

/// Longest display name accepted at registration.
pub const MAX_NAME_LEN: usize = 255;

/// Participant service for business logic.
#[derive(Clone)]
pub struct ParticipantService {
    db: Arc<DatabaseConnection>,
    participant_repo: ParticipantRepository,
    id_gen: IdGenerator,
}

impl ParticipantService {
    /// Create a new participant service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            participant_repo: ParticipantRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a participant under a display name.
    ///
    /// Names are not unique; two registrations with the same name are two
    /// participants.
    pub async fn register(&self, name: &str) -> AppResult<participant::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Name is too long (max {MAX_NAME_LEN} chars)"
            )));
        }

        let model = participant::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let participant = self
            .participant_repo
            .create(self.db.as_ref(), model)
            .await?;
        info!(participant_id = %participant.id, name = %participant.name, "Participant registered");

        Ok(participant)
    }

    /// Get a participant by ID.
    pub async fn get(&self, id: &str) -> AppResult<participant::Model> {
        self.participant_repo.get_by_id(self.db.as_ref(), id).await
    }

    /// Remove a participant together with their votes and message (admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.participant_repo.delete(self.db.as_ref(), id).await? {
            return Err(AppError::NotFound(format!("Participant not found: {id}")));
        }
        info!(participant_id = %id, "Participant deleted");
        Ok(())
    }
}
