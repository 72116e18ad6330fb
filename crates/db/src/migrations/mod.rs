//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20251001_000001_create_participant_table;
mod m20251001_000002_create_question_table;
mod m20251001_000003_create_question_option_table;
mod m20251001_000004_create_vote_table;
mod m20251001_000005_create_message_table;
mod m20251001_000006_create_voting_config_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_participant_table::Migration),
            Box::new(m20251001_000002_create_question_table::Migration),
            Box::new(m20251001_000003_create_question_option_table::Migration),
            Box::new(m20251001_000004_create_vote_table::Migration),
            Box::new(m20251001_000005_create_message_table::Migration),
            Box::new(m20251001_000006_create_voting_config_table::Migration),
        ]
    }
}
