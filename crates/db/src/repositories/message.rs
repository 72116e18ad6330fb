//! Message repository.

use crate::entities::{Message, message};
use ballot_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::map_insert_err;

/// Message repository for database operations.
#[derive(Clone, Debug, Default)]
pub struct MessageRepository;

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find the message of a participant.
    pub async fn find_by_participant<C: ConnectionTrait>(
        &self,
        conn: &C,
        participant_id: &str,
    ) -> AppResult<Option<message::Model>> {
        Message::find()
            .filter(message::Column::ParticipantId.eq(participant_id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all messages, newest first.
    pub async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Vec<message::Model>> {
        Message::find()
            .order_by_desc(message::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new message.
    ///
    /// A second message for the same participant fails with [`AppError::Conflict`].
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: message::ActiveModel,
    ) -> AppResult<message::Model> {
        model.insert(conn).await.map_err(map_insert_err)
    }

    /// Replace the text of an existing message.
    pub async fn update_text<C: ConnectionTrait>(
        &self,
        conn: &C,
        existing: message::Model,
        text: &str,
    ) -> AppResult<message::Model> {
        let mut active: message::ActiveModel = existing.into();
        active.text = Set(text.to_string());
        active
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_all_returns_rows_in_query_order() {
        let now = Utc::now();
        let newer = message::Model {
            id: "m2".to_string(),
            participant_id: "p2".to_string(),
            text: "Congratulations!".to_string(),
            created_at: now.into(),
        };
        let older = message::Model {
            id: "m1".to_string(),
            participant_id: "p1".to_string(),
            text: "Happy anniversary".to_string(),
            created_at: (now - Duration::hours(1)).into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[newer, older]])
            .into_connection();

        let repo = MessageRepository::new();
        let messages = repo.find_all(&db).await.unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "m2");
    }

    #[tokio::test]
    async fn test_find_by_participant_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<message::Model>::new()])
            .into_connection();

        let repo = MessageRepository::new();
        assert!(repo.find_by_participant(&db, "p1").await.unwrap().is_none());
    }
}
