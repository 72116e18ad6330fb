//! Vote repository.

use crate::entities::{QuestionOption, Vote, question_option, vote};
use ballot_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, sea_query::Expr,
};

use super::map_insert_err;

/// Vote count of one option.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct OptionVoteCount {
    pub option_id: String,
    pub option_text: String,
    pub vote_count: i64,
}

/// Vote repository for database operations.
#[derive(Clone, Debug, Default)]
pub struct VoteRepository;

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find the vote a participant cast on a question.
    pub async fn find_by_participant_and_question<C: ConnectionTrait>(
        &self,
        conn: &C,
        participant_id: &str,
        question_id: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find()
            .filter(vote::Column::ParticipantId.eq(participant_id))
            .filter(vote::Column::QuestionId.eq(question_id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all votes of a participant, oldest first.
    pub async fn find_by_participant<C: ConnectionTrait>(
        &self,
        conn: &C,
        participant_id: &str,
    ) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::ParticipantId.eq(participant_id))
            .order_by_asc(vote::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new vote.
    ///
    /// A second vote for the same (participant, question) pair fails with
    /// [`AppError::Conflict`].
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: vote::ActiveModel,
    ) -> AppResult<vote::Model> {
        model.insert(conn).await.map_err(map_insert_err)
    }

    /// Point an existing vote at a different option. `created_at` is left untouched.
    pub async fn update_option<C: ConnectionTrait>(
        &self,
        conn: &C,
        existing: vote::Model,
        option_id: &str,
    ) -> AppResult<vote::Model> {
        let mut active: vote::ActiveModel = existing.into();
        active.option_id = Set(option_id.to_string());
        active
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count votes per option of a question.
    ///
    /// Every option of the question is returned in order-key order, including
    /// options nobody voted for.
    pub async fn count_by_option<C: ConnectionTrait>(
        &self,
        conn: &C,
        question_id: &str,
    ) -> AppResult<Vec<OptionVoteCount>> {
        QuestionOption::find()
            .select_only()
            .column_as(question_option::Column::Id, "option_id")
            .column_as(question_option::Column::Text, "option_text")
            .column_as(Expr::col((Vote, vote::Column::Id)).count(), "vote_count")
            .join(JoinType::LeftJoin, question_option::Relation::Votes.def())
            .filter(question_option::Column::QuestionId.eq(question_id))
            .group_by(question_option::Column::Id)
            .group_by(question_option::Column::Text)
            .group_by(question_option::Column::OrderKey)
            .order_by_asc(question_option::Column::OrderKey)
            .into_model::<OptionVoteCount>()
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_vote(option_id: &str) -> vote::Model {
        vote::Model {
            id: "v1".to_string(),
            participant_id: "p1".to_string(),
            question_id: "q1".to_string(),
            option_id: option_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_participant_and_question() {
        let vote = create_test_vote("o1");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[vote.clone()]])
            .into_connection();

        let repo = VoteRepository::new();
        let found = repo
            .find_by_participant_and_question(&db, "p1", "q1")
            .await
            .unwrap();

        assert_eq!(found, Some(vote));
    }

    #[tokio::test]
    async fn test_update_option_keeps_created_at() {
        let original = create_test_vote("o1");
        let changed = vote::Model {
            option_id: "o2".to_string(),
            ..original.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[changed.clone()]])
            .into_connection();

        let repo = VoteRepository::new();
        let updated = repo.update_option(&db, original.clone(), "o2").await.unwrap();

        assert_eq!(updated.option_id, "o2");
        assert_eq!(updated.created_at, original.created_at);
    }
}
