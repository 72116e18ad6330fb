//! Voting window configuration. A single row keyed by [`VOTING_CONFIG_ID`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voting_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Explicitly closed by an administrator
    pub is_closed: bool,

    /// Voting closes once this instant is reached
    #[sea_orm(nullable)]
    pub end_time: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Singleton ID for the voting config
pub const VOTING_CONFIG_ID: &str = "voting";
