//! Customer order route handlers.
//!
//! Order creation happens when the client reports a successful gateway
//! charge; there is no webhook. The handler trusts the submitted totals,
//! stamps the order `paid`, and runs every write in one transaction.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use suya_core::{OrderItemId, OrderStatus, PaymentStatus, ProductId, format_naira};

use crate::db::OrderRepository;
use crate::db::orders::{NewOrder, NewOrderItem};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderItem, ShippingDetails};
use crate::services::email::OrderEmailLine;
use crate::services::receipt::render_receipt;
use crate::state::AppState;

/// Alphabet for order and tracking numbers. Ambiguous glyphs (0/O, 1/I)
/// are excluded so the codes survive being read over the phone.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of the random segment of order and tracking numbers.
const CODE_LENGTH: usize = 10;

/// Generate a prefixed code like `SHS-K2MF8QPZ3W`.
fn generate_code(prefix: &str) -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(prefix.len() + CODE_LENGTH);
    code.push_str(prefix);
    for _ in 0..CODE_LENGTH {
        let index = rng.random_range(0..CODE_ALPHABET.len());
        code.push(char::from(CODE_ALPHABET[index]));
    }
    code
}

/// Truncate free-form client input to a column limit, char-safe.
fn clamp(value: Option<String>, max: usize) -> Option<String> {
    value.map(|v| v.chars().take(max).collect())
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// One purchased line as submitted by the checkout client.
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: Option<i32>,
}

/// Shipping address as submitted by the checkout client.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShippingAddressInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

/// Order creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub shipping_address: ShippingAddressInput,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub total: f64,
    #[serde(default)]
    pub shipping_amount: f64,
    #[serde(default)]
    pub tax_amount: f64,
    pub currency: Option<String>,
}

/// Order line shape returned to the client.
#[derive(Debug, Serialize)]
pub struct OrderItemDto {
    pub id: OrderItemId,
    pub product_name: String,
    pub product_price: f64,
    pub quantity: i32,
    pub total_price: f64,
}

impl From<OrderItem> for OrderItemDto {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            product_name: item.product_name,
            product_price: item.product_price.to_f64().unwrap_or(0.0),
            quantity: item.quantity,
            total_price: item.total_price.to_f64().unwrap_or(0.0),
        }
    }
}

/// Order shape returned to the client.
#[derive(Debug, Serialize)]
pub struct OrderDto {
    pub id: suya_core::OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub shipping_amount: f64,
    pub tax_amount: f64,
    pub currency: String,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemDto>,
}

impl OrderDto {
    fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            status: order.status,
            payment_status: order.payment_status,
            total_amount: order.total_amount.to_f64().unwrap_or(0.0),
            shipping_amount: order.shipping_amount.to_f64().unwrap_or(0.0),
            tax_amount: order.tax_amount.to_f64().unwrap_or(0.0),
            currency: order.currency,
            tracking_number: order.tracking_number,
            shipped_at: order.shipped_at,
            delivered_at: order.delivered_at,
            created_at: order.created_at,
            items: items.into_iter().map(OrderItemDto::from).collect(),
        }
    }
}

/// Recent-orders query parameters.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}

/// Place an order.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.items.is_empty() {
        return Err(AppError::BadRequest("No items".to_string()));
    }

    let order_number = generate_code("SHS-");
    let tracking_number = generate_code("SHS-TRK-");

    let payment_method = clamp(
        Some(request.payment_method.unwrap_or_else(|| "paystack".to_string())),
        50,
    );
    let payment_reference = clamp(request.payment_reference, 255);
    let currency = clamp(
        Some(request.currency.unwrap_or_else(|| "NGN".to_string()).to_uppercase()),
        3,
    )
    .unwrap_or_else(|| "NGN".to_string());

    let s = request.shipping_address;
    let shipping = ShippingDetails {
        first_name: clamp(s.first_name, 100),
        last_name: clamp(s.last_name, 100),
        address_line1: clamp(s.address_line1, 255),
        address_line2: clamp(s.address_line2, 255),
        city: clamp(s.city, 100),
        state: clamp(s.state, 100),
        postal_code: clamp(s.postal_code, 20),
        country: clamp(s.country.or_else(|| Some("Nigeria".to_string())), 100),
        phone: clamp(s.phone, 20),
    };

    let items: Vec<NewOrderItem> = request
        .items
        .into_iter()
        .map(|item| {
            let quantity = item.quantity.unwrap_or(1).max(1);
            let price = decimal(item.price);
            NewOrderItem {
                product_id: item.product_id,
                product_name: item.name.chars().take(255).collect(),
                product_price: price,
                quantity,
                total_price: price * Decimal::from(quantity),
            }
        })
        .collect();

    let (order, order_items) = OrderRepository::new(state.pool())
        .create(NewOrder {
            user_id: user.id,
            order_number: &order_number,
            tracking_number: &tracking_number,
            payment_method: payment_method.as_deref(),
            payment_reference: payment_reference.as_deref(),
            currency: &currency,
            total_amount: decimal(request.total),
            shipping_amount: decimal(request.shipping_amount),
            tax_amount: decimal(request.tax_amount),
            shipping: &shipping,
            items,
        })
        .await?;

    // Confirmation email is best-effort; the order is already committed
    if let Some(email) = state.email() {
        let lines: Vec<OrderEmailLine> = order_items
            .iter()
            .map(|item| OrderEmailLine {
                name: item.product_name.clone(),
                quantity: item.quantity,
                price: format_naira(item.product_price),
            })
            .collect();
        let orders_url = format!("{}/orders", state.config().base_url);
        if let Err(e) = email
            .send_order_confirmation(
                user.email.as_str(),
                user.name.as_deref().unwrap_or("there"),
                &order.order_number,
                &format_naira(order.total_amount),
                &lines,
                &orders_url,
            )
            .await
        {
            tracing::warn!("failed to send order confirmation email: {e}");
        }
    }

    let order_number = order.order_number.clone();
    let dto = OrderDto::from_parts(order, order_items);

    Ok(Json(json!({
        "success": true,
        "order_number": order_number,
        "order": dto,
    })))
}

/// List the user's orders, newest first.
#[instrument(skip(state, user))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_by_user(user.id, None)
        .await?;

    let dtos: Vec<OrderDto> = orders
        .into_iter()
        .map(|(order, items)| OrderDto::from_parts(order, items))
        .collect();

    Ok(Json(json!({ "orders": dtos })))
}

/// List the user's most recent orders. `limit` is clamped to 1..=20.
#[instrument(skip(state, user))]
pub async fn recent(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<OrderDto>>> {
    let limit = query.limit.unwrap_or(5).clamp(1, 20);

    let orders = OrderRepository::new(state.pool())
        .list_by_user(user.id, Some(limit))
        .await?;

    Ok(Json(
        orders
            .into_iter()
            .map(|(order, items)| OrderDto::from_parts(order, items))
            .collect(),
    ))
}

/// Order count and paid spend for the user.
#[instrument(skip(state, user))]
pub async fn stats(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let stats = OrderRepository::new(state.pool()).user_stats(user.id).await?;

    Ok(Json(json!({
        "total_orders": stats.total_orders,
        "total_spent": stats.total_spent.to_f64().unwrap_or(0.0),
    })))
}

/// Download an order receipt as PDF. Owner or admin only.
#[instrument(skip(state, user))]
pub async fn receipt(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse> {
    let (order, items) = OrderRepository::new(state.pool())
        .get_by_number(&order_number)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != Some(user.id) && !user.is_admin() {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    let customer_name = order
        .shipping
        .recipient()
        .or_else(|| user.name.clone())
        .unwrap_or_else(|| user.email.to_string());

    let bytes = render_receipt(&order, &items, &customer_name, &state.config().base_url)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}.pdf\"", order.order_number),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_use_fixed_alphabet() {
        let code = generate_code("SHS-");
        assert!(code.starts_with("SHS-"));
        assert_eq!(code.len(), 4 + CODE_LENGTH);
        for c in code.trim_start_matches("SHS-").chars() {
            assert!(
                CODE_ALPHABET.contains(&(c as u8)),
                "unexpected character {c} in code {code}"
            );
        }
    }

    #[test]
    fn test_generated_codes_vary() {
        assert_ne!(generate_code("SHS-"), generate_code("SHS-"));
    }

    #[test]
    fn test_clamp_respects_char_boundaries() {
        assert_eq!(clamp(Some("abcdef".to_string()), 3).as_deref(), Some("abc"));
        assert_eq!(clamp(Some("ńøñ".to_string()), 2).as_deref(), Some("ńø"));
        assert_eq!(clamp(None, 3), None);
    }

    #[test]
    fn test_decimal_conversion_defaults_to_zero() {
        assert_eq!(decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(decimal(2500.0), Decimal::new(2500, 0));
    }
}
