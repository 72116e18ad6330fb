//! Question service.

use std::sync::Arc;

use ballot_common::{AppError, AppResult};
use ballot_db::repositories::{QuestionRepository, QuestionWithOptions};
use sea_orm::DatabaseConnection;

/// Read access to the question catalog.
#[derive(Clone)]
pub struct QuestionService {
    db: Arc<DatabaseConnection>,
    question_repo: QuestionRepository,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            question_repo: QuestionRepository::new(),
        }
    }

    /// List active questions and their options, both in order-key order.
    pub async fn list_active(&self) -> AppResult<Vec<QuestionWithOptions>> {
        let conn = self.db.as_ref();
        let questions = self.question_repo.find_active(conn).await?;
        self.question_repo.with_options(conn, questions).await
    }

    /// Get one question with its options.
    pub async fn get(&self, id: &str) -> AppResult<QuestionWithOptions> {
        let conn = self.db.as_ref();
        let question = self.question_repo.get_by_id(conn, id).await?;
        self.question_repo
            .with_options(conn, vec![question])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Question not found: {id}")))
    }
}
