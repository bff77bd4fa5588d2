//! Admin user management commands.

use tracing::info;

use suya_core::Email;
use suya_server::db::{self, UserRepository};
use suya_server::services::auth::hash_password;

use super::{CommandError, database_url};

/// Create an admin account, or promote an existing account by email.
///
/// # Errors
///
/// Returns an error if the email is invalid or the database write fails.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let password_hash = hash_password(password)?;
    let user = UserRepository::new(&pool)
        .upsert_admin(&email, name, &password_hash)
        .await?;

    info!(id = %user.id, email = %user.email, "Admin user ready");
    Ok(())
}
