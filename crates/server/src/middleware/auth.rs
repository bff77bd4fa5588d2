//! Authentication extractors for route handlers.
//!
//! The session middleware verifies the token and loads the user; these
//! extractors only decide what happens when that user is absent or lacks the
//! admin role. API paths get JSON errors, page paths get redirects.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::models::CurrentUser;

fn is_api_request(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but missing.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized JSON response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                if is_api_request(parts) {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin
                }
            })
    }
}

/// Extractor that requires an authenticated admin.
///
/// Non-admin users receive the same opaque `Unauthorized` body as anonymous
/// callers, just with a 403, so the response never confirms an account's
/// privilege level.
pub struct RequireAdmin(pub CurrentUser);

/// Error returned when admin access is required.
pub enum AdminRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Not logged in at all.
    Unauthorized,
    /// Logged in but not an admin; page requests go back to the storefront.
    Forbidden { api: bool },
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            Self::Forbidden { api: true } => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            Self::Forbidden { api: false } => Redirect::to("/").into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let api = is_api_request(parts);

        let user = parts.extensions.get::<CurrentUser>().cloned().ok_or({
            if api {
                AdminRejection::Unauthorized
            } else {
                AdminRejection::RedirectToLogin
            }
        })?;

        if !user.is_admin() {
            return Err(AdminRejection::Forbidden { api });
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects the request.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<CurrentUser>().cloned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::Request;
    use suya_core::{Email, UserId, UserRole};

    fn parts_for(path: &str, user: Option<CurrentUser>) -> Parts {
        let mut request = Request::builder().uri(path).body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    fn customer() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: Email::parse("c@suyahouse.shop").unwrap(),
            name: None,
            phone: None,
            role: UserRole::Customer,
        }
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            role: UserRole::Admin,
            ..customer()
        }
    }

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 4096).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_require_auth_rejects_anonymous_api_with_json_401() {
        let mut parts = parts_for("/api/cart", None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        let response = result.err().unwrap().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_of(response).await, r#"{"error":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn test_require_auth_redirects_anonymous_pages() {
        let mut parts = parts_for("/profile", None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        let response = result.err().unwrap().into_response();
        assert!(response.status().is_redirection());
    }

    #[tokio::test]
    async fn test_require_admin_rejects_customer_with_unauthorized_body() {
        let mut parts = parts_for("/api/admin/stats", Some(customer()));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        let response = result.err().unwrap().into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_of(response).await, r#"{"error":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let mut parts = parts_for("/api/admin/stats", Some(admin()));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_optional_auth_never_rejects() {
        let mut parts = parts_for("/api/products", None);
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
