//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use suya_core::{Email, UserId, UserRole};

/// A registered account.
///
/// The password hash and reset-token columns are deliberately absent; the
/// repository exposes them only through dedicated credential queries.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
