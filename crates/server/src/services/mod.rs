//! Application services.
//!
//! - [`auth`] - Passwords, session tokens, password reset
//! - [`email`] - Transactional mail over SMTP
//! - [`receipt`] - PDF receipt rendering

pub mod auth;
pub mod email;
pub mod receipt;

pub use auth::{AuthService, TokenSigner};
pub use email::EmailService;
