// src/infrastructure/repositories/sqlite/migration.rs
use crate::infrastructure::repositories::sqlite::error::{SqliteRepositoryError, SqliteResult};
use diesel::sqlite::Sqlite;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, instrument};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Apply every pending migration, returning the number applied.
#[instrument(skip(connection), level = "debug")]
pub fn run_pending(connection: &mut impl MigrationHarness<Sqlite>) -> SqliteResult<usize> {
    let pending = connection.pending_migrations(MIGRATIONS).map_err(|e| {
        SqliteRepositoryError::MigrationError(format!("Failed to check pending migrations: {}", e))
    })?;

    if pending.is_empty() {
        debug!("No pending migrations to run");
        return Ok(0);
    }
    for migration in &pending {
        debug!("Pending migration: {}", migration.name());
    }

    let applied = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        SqliteRepositoryError::MigrationError(format!("Failed to run migrations: {}", e))
    })?;
    Ok(applied.len())
}
