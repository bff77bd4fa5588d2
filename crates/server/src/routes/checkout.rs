//! Checkout configuration for the storefront client.

use axum::{Json, extract::State};
use serde_json::json;
use tracing::instrument;

use crate::state::AppState;

/// Public gateway configuration the checkout client needs.
///
/// Only the Paystack public key is ever exposed; charges happen client-side
/// and the secret key never reaches this service.
#[instrument(skip(state))]
pub async fn config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "paystack_public_key": state.config().paystack_public_key,
        "currency": "NGN",
    }))
}
