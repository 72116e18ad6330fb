//! Repository layer for database operations.
//!
//! Repositories carry no connection of their own. Every method takes the
//! connection to run on, so callers decide whether a query runs against the
//! pool or inside an open transaction.

#![allow(missing_docs)]

mod message;
mod participant;
mod question;
mod vote;
mod voting_config;

pub use message::MessageRepository;
pub use participant::ParticipantRepository;
pub use question::{QuestionOptionRepository, QuestionRepository, QuestionWithOptions};
pub use vote::{OptionVoteCount, VoteRepository};
pub use voting_config::VotingConfigRepository;

use ballot_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map an insert failure, surfacing unique index violations as [`AppError::Conflict`].
pub(crate) fn map_insert_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
        _ => AppError::Database(err.to_string()),
    }
}
