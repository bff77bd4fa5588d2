//! Session loading middleware.
//!
//! Reads the session cookie, verifies the token signature and expiry, then
//! re-fetches the user row so a deleted or demoted account is rejected even
//! while its token is still valid. On success the [`CurrentUser`] lands in
//! request extensions for the extractors in [`super::auth`].
//!
//! Verification fails closed: any malformed, expired, or tampered token is
//! treated as "not logged in", never as an error.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use suya_core::UserId;

use crate::db::UserRepository;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth-token";

/// Attach the authenticated user (if any) to the request.
pub async fn load_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(AUTH_COOKIE)
        && let Some(claims) = state.tokens().verify(cookie.value())
    {
        let users = UserRepository::new(state.pool());
        match users.get_by_id(UserId::new(claims.sub)).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(CurrentUser::from(&user));
            }
            Ok(None) => {
                tracing::debug!(user_id = claims.sub, "valid token for deleted user");
            }
            Err(e) => {
                // Degrade to logged-out rather than failing the request
                tracing::error!("session user lookup failed: {e}");
            }
        }
    }

    next.run(request).await
}
