//! Admin dashboard statistics.

use axum::{Json, extract::State};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use suya_core::OrderStatus;

use crate::db::{OrderRepository, UserRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// How many orders the dashboard's recent-orders card shows.
const RECENT_ORDER_COUNT: i64 = 5;

/// One row in the dashboard's recent-orders card.
#[derive(Debug, Serialize)]
pub struct RecentOrderDto {
    pub id: String,
    pub customer: String,
    pub product: String,
    pub amount: f64,
    pub status: OrderStatus,
}

/// Dashboard numbers.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let users = UserRepository::new(state.pool());
    let orders = OrderRepository::new(state.pool());

    let total_users = users.count_all().await?;
    let products_sold = orders.products_sold().await?;
    let active_orders = orders.active_count().await?;
    let revenue = orders.paid_revenue().await?;

    let recent_orders: Vec<RecentOrderDto> = orders
        .recent_summaries(RECENT_ORDER_COUNT)
        .await?
        .into_iter()
        .map(|summary| RecentOrderDto {
            id: summary.order_number,
            customer: summary.customer,
            product: summary.product_summary,
            amount: summary.amount.to_f64().unwrap_or(0.0),
            status: summary.status,
        })
        .collect();

    Ok(Json(json!({
        "data": {
            "total_users": total_users,
            "products_sold": products_sold,
            "active_orders": active_orders,
            "revenue": revenue.to_f64().unwrap_or(0.0),
            "recent_orders": recent_orders,
        }
    })))
}
