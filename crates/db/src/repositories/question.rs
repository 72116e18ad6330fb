//! Question and option repositories.

use std::collections::HashMap;

use crate::entities::{Question, QuestionOption, question, question_option};
use ballot_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::map_insert_err;

/// A question together with its options in order-key order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionWithOptions {
    pub question: question::Model,
    pub options: Vec<question_option::Model>,
}

/// Question repository for database operations.
#[derive(Clone, Debug, Default)]
pub struct QuestionRepository;

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a question by ID.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<question::Model>> {
        Question::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a question by ID, returning error if not found.
    pub async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<question::Model> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question not found: {id}")))
    }

    /// Find every question in order-key order.
    pub async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Vec<question::Model>> {
        Question::find()
            .order_by_asc(question::Column::OrderKey)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find active questions in order-key order.
    pub async fn find_active<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> AppResult<Vec<question::Model>> {
        Question::find()
            .filter(question::Column::IsActive.eq(true))
            .order_by_asc(question::Column::OrderKey)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach options to each question, keeping the question order.
    pub async fn with_options<C: ConnectionTrait>(
        &self,
        conn: &C,
        questions: Vec<question::Model>,
    ) -> AppResult<Vec<QuestionWithOptions>> {
        if questions.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        let options = QuestionOption::find()
            .filter(question_option::Column::QuestionId.is_in(ids))
            .order_by_asc(question_option::Column::OrderKey)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut by_question: HashMap<String, Vec<question_option::Model>> = HashMap::new();
        for option in options {
            by_question
                .entry(option.question_id.clone())
                .or_default()
                .push(option);
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let options = by_question.remove(&question.id).unwrap_or_default();
                QuestionWithOptions { question, options }
            })
            .collect())
    }

    /// Create a new question.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: question::ActiveModel,
    ) -> AppResult<question::Model> {
        model.insert(conn).await.map_err(map_insert_err)
    }

    /// Replace a question's text in place.
    pub async fn update_text<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        text: &str,
    ) -> AppResult<question::Model> {
        question::ActiveModel {
            id: Set(id.to_string()),
            text: Set(text.to_string()),
            ..Default::default()
        }
        .update(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a question. Options and votes go with it through the foreign keys.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Question::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Option repository for database operations.
#[derive(Clone, Debug, Default)]
pub struct QuestionOptionRepository;

impl QuestionOptionRepository {
    /// Create a new option repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find an option by ID, only if it belongs to the given question.
    pub async fn find_in_question<C: ConnectionTrait>(
        &self,
        conn: &C,
        question_id: &str,
        option_id: &str,
    ) -> AppResult<Option<question_option::Model>> {
        QuestionOption::find_by_id(option_id)
            .filter(question_option::Column::QuestionId.eq(question_id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find options of a question in order-key order.
    pub async fn find_by_question<C: ConnectionTrait>(
        &self,
        conn: &C,
        question_id: &str,
    ) -> AppResult<Vec<question_option::Model>> {
        QuestionOption::find()
            .filter(question_option::Column::QuestionId.eq(question_id))
            .order_by_asc(question_option::Column::OrderKey)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new option.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: question_option::ActiveModel,
    ) -> AppResult<question_option::Model> {
        model.insert(conn).await.map_err(map_insert_err)
    }

    /// Replace an option's text in place.
    pub async fn update_text<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        text: &str,
    ) -> AppResult<question_option::Model> {
        question_option::ActiveModel {
            id: Set(id.to_string()),
            text: Set(text.to_string()),
            ..Default::default()
        }
        .update(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an option. Votes for it go with it through the foreign key.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        QuestionOption::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_question(id: &str, order_key: i32) -> question::Model {
        question::Model {
            id: id.to_string(),
            text: format!("Question {order_key}"),
            order_key,
            is_active: true,
        }
    }

    fn create_test_option(id: &str, question_id: &str, order_key: i32) -> question_option::Model {
        question_option::Model {
            id: id.to_string(),
            question_id: question_id.to_string(),
            text: format!("Option {order_key}"),
            order_key,
        }
    }

    #[tokio::test]
    async fn test_with_options_groups_by_question() {
        let q1 = create_test_question("q1", 1);
        let q2 = create_test_question("q2", 2);
        let options = vec![
            create_test_option("o1", "q1", 1),
            create_test_option("o3", "q2", 1),
            create_test_option("o2", "q1", 2),
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([options])
            .into_connection();

        let repo = QuestionRepository::new();
        let result = repo.with_options(&db, vec![q1, q2]).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].question.id, "q1");
        let q1_options: Vec<&str> = result[0].options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(q1_options, vec!["o1", "o2"]);
        assert_eq!(result[1].options.len(), 1);
    }

    #[tokio::test]
    async fn test_with_options_keeps_questions_without_options() {
        let q1 = create_test_question("q1", 1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<question_option::Model>::new()])
            .into_connection();

        let repo = QuestionRepository::new();
        let result = repo.with_options(&db, vec![q1]).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].options.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<question::Model>::new()])
            .into_connection();

        let repo = QuestionRepository::new();
        let result = repo.get_by_id(&db, "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_in_question_rejects_foreign_option() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<question_option::Model>::new()])
            .into_connection();

        let repo = QuestionOptionRepository::new();
        let result = repo.find_in_question(&db, "q1", "o-of-q2").await.unwrap();

        assert!(result.is_none());
    }
}
