//! Test utilities for database operations.
//!
//! Provides a migrated SQLite database backed by a temporary file.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tempfile::NamedTempFile;
use tracing::info;

use crate::migrations::Migrator;

/// A migrated test database that lives as long as this value.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
    // Removed from disk on drop
    _file: NamedTempFile,
}

impl TestDatabase {
    /// Create a fresh database file and run all migrations on it.
    pub async fn new() -> Result<Self, DbErr> {
        let file = NamedTempFile::new().map_err(|e| DbErr::Custom(e.to_string()))?;
        let url = database_url(&file);

        let mut opt = ConnectOptions::new(&url);
        opt.sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!(url = %url, "Created test database");

        Ok(Self {
            conn: Arc::new(conn),
            _file: file,
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }
}

fn database_url(file: &NamedTempFile) -> String {
    format!(
        "sqlite:{}?mode=rwc",
        file.path().to_string_lossy().replace('\\', "/")
    )
}
