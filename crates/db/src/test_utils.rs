//! Test utilities for database operations.
//!
//! Provides a migrated SQLite database living in a temporary directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use tracing::info;

use crate::migrations::Migrator;

/// A test database context that manages the lifecycle of a test database.
///
/// The backing directory is removed when the value is dropped.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
    dir: TempDir,
}

impl TestDatabase {
    /// Create a fresh, migrated database in a new temporary directory.
    pub async fn new() -> Result<Self, DbErr> {
        let dir = tempfile::tempdir().map_err(|e| DbErr::Custom(e.to_string()))?;
        let path = dir.path().join("famfeed-test.db");

        let mut opt = ConnectOptions::new(crate::sqlite_url(&path));
        opt.max_connections(1).sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!(path = %path.display(), "Created test database");

        Ok(Self {
            conn: Arc::new(conn),
            dir,
        })
    }

    /// Get a shared handle to the connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Temporary directory owned by this database.
    ///
    /// Tests put their uploads directory here so everything is cleaned up together.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// A subdirectory of [`Self::dir`] for uploaded files.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::repositories::SettingsRepository;

    #[tokio::test]
    async fn test_new_database_is_migrated() {
        let db = TestDatabase::new().await.unwrap();
        let repo = SettingsRepository::new(db.connection());

        assert!(!repo.is_setup_done().await.unwrap());
        assert!(db.dir().exists());
    }
}
