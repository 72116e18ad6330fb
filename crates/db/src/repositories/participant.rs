//! Participant repository.

use crate::entities::{Participant, participant};
use ballot_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait};

use super::map_insert_err;

/// Participant repository for database operations.
#[derive(Clone, Debug, Default)]
pub struct ParticipantRepository;

impl ParticipantRepository {
    /// Create a new participant repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a participant by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<participant::Model>> {
        Participant::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a participant by ID, returning an error if not found.
    pub async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<participant::Model> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Participant not found: {id}")))
    }

    /// Create a new participant.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: participant::ActiveModel,
    ) -> AppResult<participant::Model> {
        model.insert(conn).await.map_err(map_insert_err)
    }

    /// Delete a participant. Votes and message go with it through the foreign keys.
    ///
    /// Returns whether a row was removed.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<bool> {
        let result = Participant::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
