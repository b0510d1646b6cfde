//! Database layer for famfeed.
//!
//! A single SQLite file holds posts, family members and the settings row.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use famfeed_common::AppError;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::path::Path;
use std::time::Duration;
use tracing::log::LevelFilter;

/// Connection URL for a SQLite file, created if missing.
#[must_use]
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Initialize database connection.
pub async fn init(path: &Path) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(sqlite_url(path));

    // SQLite serializes writers anyway; a small pool avoids lock contention.
    opt.max_connections(4)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Map a database error, surfacing unique-constraint violations as conflicts.
pub(crate) fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
        _ => AppError::Database(err.to_string()),
    }
}
