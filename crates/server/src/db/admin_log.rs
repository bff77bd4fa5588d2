//! Back-office audit trail.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use suya_core::UserId;

use super::RepositoryError;

/// Repository for the admin audit log.
pub struct AdminLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminLogRepository<'a> {
    /// Create a new admin log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit entry for an admin mutation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record(
        &self,
        admin_id: UserId,
        action: &str,
        entity_type: &str,
        entity_id: &str,
        details: &JsonValue,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO admin_log (admin_id, action, entity_type, entity_id, details)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(admin_id.as_i32())
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(details)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
