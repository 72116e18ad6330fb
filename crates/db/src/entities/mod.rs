//! Database entities.

pub mod message;
pub mod participant;
pub mod question;
pub mod question_option;
pub mod vote;
pub mod voting_config;

pub use message::Entity as Message;
pub use participant::Entity as Participant;
pub use question::Entity as Question;
pub use question_option::Entity as QuestionOption;
pub use vote::Entity as Vote;
pub use voting_config::Entity as VotingConfig;
