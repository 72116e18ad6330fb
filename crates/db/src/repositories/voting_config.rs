//! Voting config repository.

use crate::entities::{VotingConfig, voting_config, voting_config::VOTING_CONFIG_ID};
use ballot_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use super::map_insert_err;

/// Repository for the singleton voting config row.
#[derive(Clone, Debug, Default)]
pub struct VotingConfigRepository;

impl VotingConfigRepository {
    /// Create a new voting config repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find the voting config.
    pub async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> AppResult<Option<voting_config::Model>> {
        VotingConfig::find_by_id(VOTING_CONFIG_ID)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert the default row: open, no deadline.
    pub async fn create_default<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> AppResult<voting_config::Model> {
        voting_config::ActiveModel {
            id: Set(VOTING_CONFIG_ID.to_string()),
            is_closed: Set(false),
            end_time: Set(None),
        }
        .insert(conn)
        .await
        .map_err(map_insert_err)
    }

    /// Get the voting config, creating the default row if none exists.
    pub async fn get_or_create<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> AppResult<voting_config::Model> {
        if let Some(config) = self.find(conn).await? {
            return Ok(config);
        }
        self.create_default(conn).await
    }

    /// Overwrite the voting window.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        is_closed: bool,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<voting_config::Model> {
        voting_config::ActiveModel {
            id: Set(VOTING_CONFIG_ID.to_string()),
            is_closed: Set(is_closed),
            end_time: Set(end_time.map(Into::into)),
        }
        .update(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_or_create_returns_existing_row() {
        let existing = voting_config::Model {
            id: VOTING_CONFIG_ID.to_string(),
            is_closed: true,
            end_time: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .into_connection();

        let repo = VotingConfigRepository::new();
        let config = repo.get_or_create(&db).await.unwrap();

        assert_eq!(config, existing);
    }

    #[tokio::test]
    async fn test_get_or_create_inserts_default() {
        let created = voting_config::Model {
            id: VOTING_CONFIG_ID.to_string(),
            is_closed: false,
            end_time: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<voting_config::Model>::new()])
            .append_query_results([[created.clone()]])
            .into_connection();

        let repo = VotingConfigRepository::new();
        let config = repo.get_or_create(&db).await.unwrap();

        assert_eq!(config, created);
    }
}
