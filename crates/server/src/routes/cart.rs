//! Cart route handlers.
//!
//! The server only persists carts for authenticated users; guests keep a
//! browser-local cart that is merged by the client after login.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use suya_core::ProductId;

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::state::AppState;

/// Cart line shape returned to the client. `id` mirrors the product id,
/// which is what the storefront uses to key cart rows.
#[derive(Debug, Serialize)]
pub struct CartItemDto {
    pub id: ProductId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub slug: String,
    pub stock_quantity: i32,
}

impl From<CartLine> for CartItemDto {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.product_id,
            product_id: line.product_id,
            quantity: line.quantity,
            name: line.name,
            price: line.price.to_f64().unwrap_or(0.0),
            image: line.image_url,
            slug: line.slug,
            stock_quantity: line.stock_quantity,
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<i32>,
}

/// Set-quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Remove-line query parameters.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub product_id: ProductId,
}

async fn cart_items(state: &AppState, user_id: suya_core::UserId) -> Result<Vec<CartItemDto>> {
    let lines = CartRepository::new(state.pool()).list(user_id).await?;
    Ok(lines.into_iter().map(CartItemDto::from).collect())
}

/// Get the cart.
#[instrument(skip(state, user))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let items = cart_items(&state, user.id).await?;
    Ok(Json(json!({ "items": items })))
}

/// Add a product to the cart.
///
/// Adding the same product twice increments the one existing row; the
/// composite unique key makes concurrent adds safe.
#[instrument(skip(state, user, request))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<serde_json::Value>> {
    let quantity = request.quantity.unwrap_or(1).max(1);

    // Reject unknown products with a client error before the insert
    ProductRepository::new(state.pool())
        .get_by_id(request.product_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown product".to_string()))?;

    CartRepository::new(state.pool())
        .upsert(user.id, request.product_id, quantity)
        .await?;

    let items = cart_items(&state, user.id).await?;
    Ok(Json(json!({ "success": true, "items": items })))
}

/// Set a cart line's quantity; zero or less removes the line.
#[instrument(skip(state, user, request))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<serde_json::Value>> {
    CartRepository::new(state.pool())
        .set_quantity(user.id, request.product_id, request.quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Cart item not found".to_string()),
            other => AppError::Database(other),
        })?;

    let items = cart_items(&state, user.id).await?;
    Ok(Json(json!({ "success": true, "items": items })))
}

/// Remove one line from the cart.
#[instrument(skip(state, user))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<RemoveQuery>,
) -> Result<Json<serde_json::Value>> {
    CartRepository::new(state.pool())
        .remove(user.id, query.product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Cart item not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true })))
}

/// Empty the cart.
#[instrument(skip(state, user))]
pub async fn clear(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(Json(json!({ "success": true })))
}
