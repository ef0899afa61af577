//! Embedded database migrations.

use sqlx::PgPool;
use tracing::info;

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;

/// Apply every pending migration from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to run migrations", e))?;

    info!("Database migrations applied");
    Ok(())
}
