//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use ballot_common::{AppError, AppResult};
use ballot_core::{
    MessageService, ParticipantService, QuestionService, ReconcileReport, TallyService,
    VotingService,
};
use sea_orm::DatabaseConnection;

/// Outcome of the startup catalog reconciliation.
#[derive(Clone, Debug, Default)]
pub struct CatalogState {
    pub ready: bool,
    pub error: Option<String>,
}

impl CatalogState {
    /// The catalog converged.
    #[must_use]
    pub const fn ready() -> Self {
        Self {
            ready: true,
            error: None,
        }
    }

    /// The catalog failed to converge; whatever was persisted before is still served.
    #[must_use]
    pub fn failed(err: &AppError) -> Self {
        Self {
            ready: false,
            error: Some(err.to_string()),
        }
    }

    /// State for a reconciliation result.
    #[must_use]
    pub fn from_result(result: &AppResult<ReconcileReport>) -> Self {
        match result {
            Ok(_) => Self::ready(),
            Err(e) => Self::failed(e),
        }
    }
}

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub participant_service: ParticipantService,
    pub question_service: QuestionService,
    pub voting_service: VotingService,
    pub message_service: MessageService,
    pub tally_service: TallyService,
    pub catalog: CatalogState,
}

impl AppState {
    /// Build every service on one shared connection pool.
    #[must_use]
    pub fn new(db: &Arc<DatabaseConnection>, catalog: CatalogState) -> Self {
        Self {
            participant_service: ParticipantService::new(Arc::clone(db)),
            question_service: QuestionService::new(Arc::clone(db)),
            voting_service: VotingService::new(Arc::clone(db)),
            message_service: MessageService::new(Arc::clone(db)),
            tally_service: TallyService::new(Arc::clone(db)),
            catalog,
        }
    }
}
