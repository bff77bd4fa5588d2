//! Domain models shared between the data layer and route handlers.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use address::Address;
pub use cart::CartLine;
pub use order::{Order, OrderItem, ShippingDetails};
pub use product::Product;
pub use user::User;

use serde::{Deserialize, Serialize};

use suya_core::{Email, UserId, UserRole};

/// The authenticated user attached to a request.
///
/// Built by the session middleware from a verified token plus a fresh user
/// row, so a deleted account is rejected even while its token is still valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether this user may access the admin back-office.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
        }
    }
}
