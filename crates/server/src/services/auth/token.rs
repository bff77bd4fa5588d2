//! Session token signing and verification.
//!
//! One token format for everyone: the role claim is the only thing that
//! separates a customer session from an admin session.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use suya_core::UserRole;

use super::AuthError;
use crate::models::CurrentUser;

/// Session lifetime.
pub const TOKEN_TTL_DAYS: i64 = 1;

/// Claims carried in the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    /// Build a signer from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for a user, expiring in [`TOKEN_TTL_DAYS`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue(&self, user: &CurrentUser) -> Result<String, AuthError> {
        self.issue_expiring_at(user, Utc::now() + Duration::days(TOKEN_TTL_DAYS))
    }

    /// Issue a token with an explicit expiry instant.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue_expiring_at(
        &self,
        user: &CurrentUser,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.as_i32(),
            email: user.email.to_string(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token, failing closed.
    ///
    /// Returns `None` for anything that isn't a well-formed, correctly signed,
    /// unexpired token - never an error, never a panic.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Claims> {
        if token.is_empty() {
            return None;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .ok()
            .map(|data| data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use suya_core::{Email, UserId};

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from(
            "kQ7vX2mN9pL4wR8tY3uB6cD1eF5gH0jZ".to_string(),
        ))
    }

    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            email: Email::parse("chef@suyahouse.shop").unwrap(),
            name: Some("Chef".to_string()),
            phone: None,
            role: UserRole::Customer,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let signer = signer();
        let token = signer.issue(&user()).unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "chef@suyahouse.shop");
        assert_eq!(claims.role, UserRole::Customer);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let token = signer
            .issue_expiring_at(&user(), Utc::now() - Duration::hours(1))
            .unwrap();
        assert!(signer.verify(&token).is_none());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let signer = signer();
        let token = signer.issue(&user()).unwrap();

        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(signer.verify(&tampered).is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        let signer = signer();
        assert!(signer.verify("").is_none());
        assert!(signer.verify("not-a-token").is_none());
        assert!(signer.verify("a.b.c").is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = signer().issue(&user()).unwrap();
        let other = TokenSigner::new(&SecretString::from(
            "zZ9yX8wV7uT6sR5qP4oN3mL2kJ1iH0gF".to_string(),
        ));
        assert!(other.verify(&token).is_none());
    }
}
