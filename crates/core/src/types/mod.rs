//! Core domain types shared across the workspace.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::format_naira;
pub use status::{AddressKind, OrderStatus, PaymentStatus, ProductCategory, UserRole};
