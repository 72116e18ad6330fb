//! Catalog reconciliation service.
//!
//! Converges the persisted questions and options onto a desired catalog.
//! Rows are matched by order key, so a text change is an in-place update that
//! keeps ids and votes, while a removed order key deletes the row and
//! everything hanging off it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use ballot_common::{AppError, AppResult, IdGenerator};
use ballot_db::{
    entities::{question, question_option},
    repositories::{
        QuestionOptionRepository, QuestionRepository, QuestionWithOptions, VotingConfigRepository,
    },
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{self, Catalog, CatalogEntry};

/// One mutation needed to converge persisted state onto a catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogChange {
    DeleteQuestion {
        id: String,
        order_key: i32,
    },
    CreateQuestion {
        order_key: i32,
        text: String,
    },
    UpdateQuestionText {
        id: String,
        order_key: i32,
        previous: String,
        text: String,
    },
    DeleteOption {
        id: String,
        question_order_key: i32,
        order_key: i32,
    },
    /// The parent is referenced by order key since it may be created in the same run.
    CreateOption {
        question_order_key: i32,
        order_key: i32,
        text: String,
    },
    UpdateOptionText {
        id: String,
        question_order_key: i32,
        order_key: i32,
        previous: String,
        text: String,
    },
}

/// Summary of a reconciliation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub questions_created: usize,
    pub questions_updated: usize,
    pub questions_deleted: usize,
    pub options_created: usize,
    pub options_updated: usize,
    pub options_deleted: usize,
    pub config_created: bool,
}

impl ReconcileReport {
    /// Number of rows written by the run.
    #[must_use]
    pub const fn total_mutations(&self) -> usize {
        self.questions_created
            + self.questions_updated
            + self.questions_deleted
            + self.options_created
            + self.options_updated
            + self.options_deleted
            + self.config_created as usize
    }

    fn record(&mut self, change: &CatalogChange) {
        match change {
            CatalogChange::DeleteQuestion { .. } => self.questions_deleted += 1,
            CatalogChange::CreateQuestion { .. } => self.questions_created += 1,
            CatalogChange::UpdateQuestionText { .. } => self.questions_updated += 1,
            CatalogChange::DeleteOption { .. } => self.options_deleted += 1,
            CatalogChange::CreateOption { .. } => self.options_created += 1,
            CatalogChange::UpdateOptionText { .. } => self.options_updated += 1,
        }
    }
}

/// Compute the changes that turn `persisted` into `catalog`.
///
/// Removed questions come first, then each catalog entry in order followed by
/// the diff of its options.
#[must_use]
pub fn plan(catalog: &Catalog, persisted: &[QuestionWithOptions]) -> Vec<CatalogChange> {
    let desired: HashSet<i32> = catalog.iter().map(|entry| entry.order_key).collect();
    let by_key: HashMap<i32, &QuestionWithOptions> = persisted
        .iter()
        .map(|q| (q.question.order_key, q))
        .collect();

    let mut changes = Vec::new();

    for existing in persisted {
        if !desired.contains(&existing.question.order_key) {
            changes.push(CatalogChange::DeleteQuestion {
                id: existing.question.id.clone(),
                order_key: existing.question.order_key,
            });
        }
    }

    for entry in catalog {
        let existing_options: &[question_option::Model] = match by_key.get(&entry.order_key) {
            None => {
                changes.push(CatalogChange::CreateQuestion {
                    order_key: entry.order_key,
                    text: entry.text.to_string(),
                });
                &[]
            }
            Some(existing) => {
                if existing.question.text != entry.text {
                    changes.push(CatalogChange::UpdateQuestionText {
                        id: existing.question.id.clone(),
                        order_key: entry.order_key,
                        previous: existing.question.text.clone(),
                        text: entry.text.to_string(),
                    });
                }
                &existing.options
            }
        };

        plan_options(entry, existing_options, &mut changes);
    }

    changes
}

fn plan_options(
    entry: &CatalogEntry,
    persisted: &[question_option::Model],
    changes: &mut Vec<CatalogChange>,
) {
    let desired: HashSet<i32> = entry.options.iter().map(|opt| opt.order_key).collect();
    let by_key: HashMap<i32, &question_option::Model> =
        persisted.iter().map(|opt| (opt.order_key, opt)).collect();

    for existing in persisted {
        if !desired.contains(&existing.order_key) {
            changes.push(CatalogChange::DeleteOption {
                id: existing.id.clone(),
                question_order_key: entry.order_key,
                order_key: existing.order_key,
            });
        }
    }

    for opt in entry.options {
        match by_key.get(&opt.order_key) {
            None => changes.push(CatalogChange::CreateOption {
                question_order_key: entry.order_key,
                order_key: opt.order_key,
                text: opt.text.to_string(),
            }),
            Some(existing) if existing.text != opt.text => {
                changes.push(CatalogChange::UpdateOptionText {
                    id: existing.id.clone(),
                    question_order_key: entry.order_key,
                    order_key: opt.order_key,
                    previous: existing.text.clone(),
                    text: opt.text.to_string(),
                });
            }
            Some(_) => {}
        }
    }
}

/// Reconciliation service.
#[derive(Clone)]
pub struct ReconcileService {
    db: Arc<DatabaseConnection>,
    question_repo: QuestionRepository,
    option_repo: QuestionOptionRepository,
    config_repo: VotingConfigRepository,
    id_gen: IdGenerator,
}

impl ReconcileService {
    /// Create a new reconciliation service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            question_repo: QuestionRepository::new(),
            option_repo: QuestionOptionRepository::new(),
            config_repo: VotingConfigRepository::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Converge the database onto `catalog` in a single transaction.
    ///
    /// Also creates the voting config row when it is missing. Nothing is
    /// written if any step fails.
    pub async fn reconcile(&self, catalog: &Catalog) -> AppResult<ReconcileReport> {
        self.run(catalog).await.map_err(|e| match e {
            err @ AppError::Reconciliation(_) => err,
            other => AppError::Reconciliation(other.to_string()),
        })
    }

    async fn run(&self, catalog: &Catalog) -> AppResult<ReconcileReport> {
        catalog::validate(catalog)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let questions = self.question_repo.find_all(&txn).await?;
        let persisted = self.question_repo.with_options(&txn, questions).await?;
        let changes = plan(catalog, &persisted);

        let mut question_ids: HashMap<i32, String> = persisted
            .into_iter()
            .map(|q| (q.question.order_key, q.question.id))
            .collect();

        let mut report = ReconcileReport::default();
        for change in &changes {
            self.apply(&txn, change, &mut question_ids).await?;
            report.record(change);
        }

        if self.config_repo.find(&txn).await?.is_none() {
            self.config_repo.create_default(&txn).await?;
            report.config_created = true;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(
            mutations = report.total_mutations(),
            questions_created = report.questions_created,
            questions_updated = report.questions_updated,
            questions_deleted = report.questions_deleted,
            options_created = report.options_created,
            options_updated = report.options_updated,
            options_deleted = report.options_deleted,
            "Catalog reconciled"
        );

        Ok(report)
    }

    async fn apply<C: ConnectionTrait>(
        &self,
        conn: &C,
        change: &CatalogChange,
        question_ids: &mut HashMap<i32, String>,
    ) -> AppResult<()> {
        match change {
            CatalogChange::DeleteQuestion { id, order_key } => {
                self.question_repo.delete(conn, id).await?;
                question_ids.remove(order_key);
            }
            CatalogChange::CreateQuestion { order_key, text } => {
                let model = question::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    text: Set(text.clone()),
                    order_key: Set(*order_key),
                    is_active: Set(true),
                };
                let created = self.question_repo.create(conn, model).await?;
                question_ids.insert(*order_key, created.id);
            }
            CatalogChange::UpdateQuestionText {
                id,
                order_key,
                previous,
                text,
            } => {
                warn!(
                    order_key,
                    previous = %previous,
                    text = %text,
                    "Question text changed under a kept order key; existing votes stay attached"
                );
                self.question_repo.update_text(conn, id, text).await?;
            }
            CatalogChange::DeleteOption { id, .. } => {
                self.option_repo.delete(conn, id).await?;
            }
            CatalogChange::CreateOption {
                question_order_key,
                order_key,
                text,
            } => {
                let question_id = question_ids.get(question_order_key).ok_or_else(|| {
                    AppError::Internal(format!("No question with order key {question_order_key}"))
                })?;
                let model = question_option::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    question_id: Set(question_id.clone()),
                    text: Set(text.clone()),
                    order_key: Set(*order_key),
                };
                self.option_repo.create(conn, model).await?;
            }
            CatalogChange::UpdateOptionText {
                id,
                question_order_key,
                order_key,
                previous,
                text,
            } => {
                warn!(
                    question_order_key,
                    order_key,
                    previous = %previous,
                    text = %text,
                    "Option text changed under a kept order key; existing votes stay attached"
                );
                self.option_repo.update_text(conn, id, text).await?;
            }
        }

        debug!(?change, "Applied catalog change");
        Ok(())
    }
}
