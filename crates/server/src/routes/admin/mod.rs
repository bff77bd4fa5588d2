//! Admin back-office route handlers.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin);
//! the role claim on the one shared session is the only admin gate. Each
//! mutation appends an audit entry, best-effort.

pub mod customers;
pub mod orders;
pub mod products;
pub mod stats;

use serde_json::Value as JsonValue;

use crate::db::AdminLogRepository;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Record an admin mutation in the audit log. Failures are logged and
/// swallowed; the mutation itself has already happened.
pub(crate) async fn log_action(
    state: &AppState,
    admin: &CurrentUser,
    action: &str,
    entity_type: &str,
    entity_id: &str,
    details: JsonValue,
) {
    if let Err(e) = AdminLogRepository::new(state.pool())
        .record(admin.id, action, entity_type, entity_id, &details)
        .await
    {
        tracing::warn!(action, entity_type, entity_id, "failed to record admin log: {e}");
    }
}
