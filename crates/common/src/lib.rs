//! Common utilities and shared types for ballot.
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based row identifiers via [`IdGenerator`]

pub mod config;
pub mod error;
pub mod id;

pub use config::{Config, CorsConfig, DatabaseConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
