//! Authentication route handlers.
//!
//! Signup and login set the session cookie; the cookie carries a signed token
//! whose role claim also gates the admin back-office. There is no separate
//! admin login path.

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{AUTH_COOKIE, RequireAuth};
use crate::models::{CurrentUser, User};
use crate::services::auth::{AuthService, RegisterInput, TOKEN_TTL_DAYS};
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Forgot-password request body.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset-password request body.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Build the session cookie around a signed token.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(TOKEN_TTL_DAYS))
        .build()
}

/// A cookie that overwrites and expires the session cookie.
fn removal_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

fn login_response(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<serde_json::Value>)> {
    let current = CurrentUser::from(user);
    let token = state.tokens().issue(&current).map_err(AppError::Auth)?;

    Ok((
        jar.add(session_cookie(token)),
        Json(json!({ "success": true, "user": current })),
    ))
}

/// Create an account and log it in.
#[instrument(skip(state, jar, request), fields(email = %request.email))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(RegisterInput {
            name: &request.name,
            email: &request.email,
            phone: request.phone.as_deref(),
            password: &request.password,
        })
        .await?;

    // Welcome email is best-effort; the account exists either way
    if let Some(email) = state.email() {
        let shop_url = format!("{}/products", state.config().base_url);
        if let Err(e) = email
            .send_welcome(
                user.email.as_str(),
                user.name.as_deref().unwrap_or("there"),
                &shop_url,
            )
            .await
        {
            tracing::warn!("failed to send welcome email: {e}");
        }
    }

    login_response(&state, jar, &user)
}

/// Verify credentials and start a session.
#[instrument(skip(state, jar, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&request.email, &request.password).await?;

    login_response(&state, jar, &user)
}

/// Clear the session cookie.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(removal_cookie()), Json(json!({ "success": true })))
}

/// Return the current session user.
#[instrument(skip(user))]
pub async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}

/// Start a password reset.
///
/// Responds identically whether or not the account exists, so the endpoint
/// cannot be used to probe for registered emails.
#[instrument(skip(state, request))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let auth = AuthService::new(state.pool());

    match auth.request_password_reset(&request.email).await? {
        Some((user, reset_token)) => {
            let reset_url = format!(
                "{}/auth/reset-password?token={reset_token}",
                state.config().base_url
            );

            if let Some(email) = state.email() {
                email
                    .send_password_reset(
                        user.email.as_str(),
                        user.name.as_deref().unwrap_or("there"),
                        &reset_url,
                    )
                    .await?;
            } else {
                tracing::warn!("password reset requested but email is disabled");
            }
        }
        None => {
            tracing::info!("password reset requested for unknown email");
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "If an account exists with this email, you will receive a password reset link.",
    })))
}

/// Complete a password reset.
#[instrument(skip(state, request))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let auth = AuthService::new(state.pool());
    auth.reset_password(&request.token, &request.password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password reset successfully",
    })))
}
