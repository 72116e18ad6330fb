//! Business logic services.

#![allow(missing_docs)]

pub mod message;
pub mod participant;
pub mod question;
pub mod reconcile;
pub mod tally;
pub mod voting;

pub use message::MessageService;
pub use participant::ParticipantService;
pub use question::QuestionService;
pub use reconcile::{CatalogChange, ReconcileReport, ReconcileService};
pub use tally::{OptionTally, QuestionTally, TallyService};
pub use voting::{VotingService, VotingStatus};
