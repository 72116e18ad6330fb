//! Tally service.

use std::sync::Arc;

use ballot_common::AppResult;
use ballot_db::{
    entities::question,
    repositories::{OptionVoteCount, QuestionRepository, VoteRepository},
};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Serialize;

/// Vote count of one option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionTally {
    pub option_id: String,
    pub option_text: String,
    pub count: i64,
}

impl From<OptionVoteCount> for OptionTally {
    fn from(row: OptionVoteCount) -> Self {
        Self {
            option_id: row.option_id,
            option_text: row.option_text,
            count: row.vote_count,
        }
    }
}

/// Vote counts of every option of a question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionTally {
    pub question_id: String,
    pub question: String,
    pub order_key: i32,
    /// Every option in order-key order, including those without votes
    pub vote_counts: Vec<OptionTally>,
    pub total_votes: i64,
}

/// Tally service. Read-only.
#[derive(Clone)]
pub struct TallyService {
    db: Arc<DatabaseConnection>,
    question_repo: QuestionRepository,
    vote_repo: VoteRepository,
}

impl TallyService {
    /// Create a new tally service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            question_repo: QuestionRepository::new(),
            vote_repo: VoteRepository::new(),
        }
    }

    /// Count the votes of one question.
    pub async fn tally(&self, question_id: &str) -> AppResult<QuestionTally> {
        let conn = self.db.as_ref();
        let question = self.question_repo.get_by_id(conn, question_id).await?;
        self.tally_question(conn, question).await
    }

    /// Count the votes of every active question, in order-key order (admin).
    pub async fn all_results(&self) -> AppResult<Vec<QuestionTally>> {
        let conn = self.db.as_ref();
        let questions = self.question_repo.find_active(conn).await?;

        let mut results = Vec::with_capacity(questions.len());
        for question in questions {
            results.push(self.tally_question(conn, question).await?);
        }
        Ok(results)
    }

    async fn tally_question<C: ConnectionTrait>(
        &self,
        conn: &C,
        question: question::Model,
    ) -> AppResult<QuestionTally> {
        let vote_counts: Vec<OptionTally> = self
            .vote_repo
            .count_by_option(conn, &question.id)
            .await?
            .into_iter()
            .map(OptionTally::from)
            .collect();
        let total_votes = vote_counts.iter().map(|c| c.count).sum();

        Ok(QuestionTally {
            question_id: question.id,
            question: question.text,
            order_key: question.order_key,
            vote_counts,
            total_votes,
        })
    }
}
