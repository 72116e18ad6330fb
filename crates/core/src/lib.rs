//! Core business logic for ballot.

pub mod catalog;
pub mod services;

pub use catalog::{Catalog, CatalogEntry, CatalogOption, DEFAULT_CATALOG};
pub use services::*;
