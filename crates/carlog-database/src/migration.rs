//! Schema migrations embedded from `migrations/` at build time.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::info;

use carlog_core::error::{AppError, ErrorKind};

/// The users schema, compiled into the binary.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to the newest embedded version.
///
/// Already-applied versions are skipped; a checksum mismatch on one of them
/// aborts startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let latest = MIGRATOR.iter().map(|m| m.version).max();
    info!(
        known = MIGRATOR.iter().count(),
        latest = ?latest,
        "Applying users schema"
    );

    MIGRATOR.run(pool).await.map_err(migration_error)?;

    info!(version = ?latest, "Users schema is current");
    Ok(())
}

fn migration_error(err: MigrateError) -> AppError {
    let message = match &err {
        MigrateError::VersionMismatch(version) => {
            format!("Applied migration {version} no longer matches its file")
        }
        MigrateError::VersionMissing(version) => {
            format!("Database has migration {version} that this build does not know")
        }
        other => format!("Schema migration failed: {other}"),
    };
    AppError::with_source(ErrorKind::Database, message, err)
}
