//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! shopora migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! the storefront crate at compile time.

use thiserror::Error;

use shopora_storefront::db;

use super::{DATABASE_URL_VAR, database_config};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run catalog database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = database_config().ok_or(MigrationError::MissingEnvVar(DATABASE_URL_VAR))?;

    tracing::info!("Connecting to catalog database...");
    let pool = db::create_pool(&config).await?;

    tracing::info!(
        migrations = db::MIGRATOR.iter().count(),
        "Running catalog migrations..."
    );
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
