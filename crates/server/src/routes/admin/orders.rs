//! Admin order management.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use suya_core::{OrderId, OrderStatus, PaymentStatus};

use crate::db::OrderRepository;
use crate::db::orders::AdminOrder;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::log_action;

/// Line shape in the admin order listing.
#[derive(Debug, Serialize)]
pub struct AdminOrderItemDto {
    pub id: suya_core::OrderItemId,
    pub product_name: String,
    pub product_price: f64,
    pub quantity: i32,
    pub total_price: f64,
}

/// Full denormalized order shape for the back-office table.
#[derive(Debug, Serialize)]
pub struct AdminOrderDto {
    pub id: OrderId,
    pub order_number: String,
    pub user_name: String,
    pub user_email: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub shipping_amount: f64,
    pub tax_amount: f64,
    pub currency: String,
    pub shipping_first_name: String,
    pub shipping_last_name: String,
    pub shipping_address_line1: String,
    pub shipping_address_line2: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_postal_code: String,
    pub shipping_country: String,
    pub shipping_phone: String,
    pub payment_method: String,
    pub tracking_number: String,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<AdminOrderItemDto>,
}

impl From<AdminOrder> for AdminOrderDto {
    fn from(entry: AdminOrder) -> Self {
        let order = entry.order;
        let shipping = order.shipping;
        Self {
            id: order.id,
            order_number: order.order_number,
            user_name: entry.user_name.unwrap_or_else(|| "Guest".to_string()),
            user_email: entry.user_email.unwrap_or_default(),
            status: order.status,
            payment_status: order.payment_status,
            total_amount: order.total_amount.to_f64().unwrap_or(0.0),
            shipping_amount: order.shipping_amount.to_f64().unwrap_or(0.0),
            tax_amount: order.tax_amount.to_f64().unwrap_or(0.0),
            currency: order.currency,
            shipping_first_name: shipping.first_name.unwrap_or_default(),
            shipping_last_name: shipping.last_name.unwrap_or_default(),
            shipping_address_line1: shipping.address_line1.unwrap_or_default(),
            shipping_address_line2: shipping.address_line2.unwrap_or_default(),
            shipping_city: shipping.city.unwrap_or_default(),
            shipping_state: shipping.state.unwrap_or_default(),
            shipping_postal_code: shipping.postal_code.unwrap_or_default(),
            shipping_country: shipping.country.unwrap_or_default(),
            shipping_phone: shipping.phone.unwrap_or_default(),
            payment_method: order.payment_method.unwrap_or_default(),
            tracking_number: order.tracking_number.unwrap_or_default(),
            shipped_at: order.shipped_at,
            delivered_at: order.delivered_at,
            created_at: order.created_at,
            items: entry
                .items
                .into_iter()
                .map(|item| AdminOrderItemDto {
                    id: item.id,
                    product_name: item.product_name,
                    product_price: item.product_price.to_f64().unwrap_or(0.0),
                    quantity: item.quantity,
                    total_price: item.total_price.to_f64().unwrap_or(0.0),
                })
                .collect(),
        }
    }
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Tracking update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateTrackingRequest {
    pub tracking_number: String,
}

/// List every order for the back-office table.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    let data: Vec<AdminOrderDto> = orders.into_iter().map(AdminOrderDto::from).collect();

    Ok(Json(json!({ "data": data })))
}

/// Move an order through the lifecycle.
///
/// Illegal transitions (backwards moves, changes to a terminal order) are
/// rejected with 409 and leave the row untouched. The `shipped`/`delivered`
/// timestamps are stamped once and never rewritten on replays.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    let next: OrderStatus = request.status.parse().map_err(AppError::BadRequest)?;

    let order = OrderRepository::new(state.pool())
        .transition_status(id, next)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order not found".to_string()),
            other => AppError::Database(other),
        })?;

    log_action(
        &state,
        &admin,
        "order.status",
        "order",
        &order.order_number,
        json!({ "status": next }),
    )
    .await;

    Ok(Json(json!({
        "data": { "id": order.id, "status": order.status }
    })))
}

/// Set an order's tracking number.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn update_tracking(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateTrackingRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.tracking_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "tracking_number is required".to_string(),
        ));
    }

    OrderRepository::new(state.pool())
        .update_tracking(id, request.tracking_number.trim())
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order not found".to_string()),
            other => AppError::Database(other),
        })?;

    log_action(
        &state,
        &admin,
        "order.tracking",
        "order",
        &id.to_string(),
        json!({ "tracking_number": request.tracking_number.trim() }),
    )
    .await;

    Ok(Json(json!({
        "data": { "id": id, "tracking_number": request.tracking_number.trim() }
    })))
}
