//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time, so the CLI binary carries them wherever it is deployed.

use tracing::info;

use suya_server::db;

use super::{CommandError, database_url};

/// Run all pending migrations against `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if the environment variable is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
