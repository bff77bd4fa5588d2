//! Admin customer management.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use suya_core::UserId;

use crate::db::{AddressRepository, OrderRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Days within which a signup counts as "new" and an order keeps a customer
/// "active".
const ACTIVITY_WINDOW_DAYS: i64 = 30;

/// Activity label for the customer list.
///
/// "new" wins over "active": a recent signup reads as new even after their
/// first order.
fn activity_status(
    now: DateTime<Utc>,
    joined: DateTime<Utc>,
    last_order: Option<DateTime<Utc>>,
) -> &'static str {
    if (now - joined).num_days() <= ACTIVITY_WINDOW_DAYS {
        return "new";
    }
    match last_order {
        Some(last) if (now - last).num_days() <= ACTIVITY_WINDOW_DAYS => "active",
        _ => "inactive",
    }
}

/// Customer row for the admin list.
#[derive(Debug, Serialize)]
pub struct CustomerDto {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub total_orders: i64,
    pub total_spent: f64,
    pub join_date: DateTime<Utc>,
    pub last_order_date: Option<DateTime<Utc>>,
    pub status: &'static str,
}

/// List customers with their order aggregates.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let customers = UserRepository::new(state.pool()).list_customers().await?;
    let now = Utc::now();

    let data: Vec<CustomerDto> = customers
        .into_iter()
        .map(|customer| CustomerDto {
            status: activity_status(now, customer.created_at, customer.last_order_at),
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            total_orders: customer.total_orders,
            total_spent: customer.total_spent.to_f64().unwrap_or(0.0),
            join_date: customer.created_at,
            last_order_date: customer.last_order_at,
        })
        .collect();

    Ok(Json(json!({ "data": data })))
}

/// How many recent orders the customer detail view includes.
const DETAIL_ORDER_COUNT: i64 = 10;

/// Customer detail: profile, aggregates, addresses, recent orders.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<serde_json::Value>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

    let orders_repo = OrderRepository::new(state.pool());
    let stats = orders_repo.user_stats(id).await?;
    let recent = orders_repo.list_by_user(id, Some(DETAIL_ORDER_COUNT)).await?;
    let addresses = AddressRepository::new(state.pool()).list(id).await?;

    let last_order_date = recent.first().map(|(order, _)| order.created_at);
    let now = Utc::now();

    let recent_orders: Vec<serde_json::Value> = recent
        .into_iter()
        .map(|(order, _)| {
            json!({
                "id": order.id,
                "order_number": order.order_number,
                "total_amount": order.total_amount.to_f64().unwrap_or(0.0),
                "status": order.status,
                "created_at": order.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "data": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "phone": user.phone,
            "total_orders": stats.total_orders,
            "total_spent": stats.total_spent.to_f64().unwrap_or(0.0),
            "join_date": user.created_at,
            "last_order_date": last_order_date,
            "status": activity_status(now, user.created_at, last_order_date),
            "addresses": addresses,
            "recent_orders": recent_orders,
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_recent_signup_is_new() {
        let now = Utc::now();
        let joined = now - Duration::days(3);
        assert_eq!(activity_status(now, joined, None), "new");
        // Even with an old order, a fresh signup reads as new
        let old_order = now - Duration::days(90);
        assert_eq!(activity_status(now, joined, Some(old_order)), "new");
    }

    #[test]
    fn test_recent_order_is_active() {
        let now = Utc::now();
        let joined = now - Duration::days(365);
        let last_order = now - Duration::days(10);
        assert_eq!(activity_status(now, joined, Some(last_order)), "active");
    }

    #[test]
    fn test_stale_customer_is_inactive() {
        let now = Utc::now();
        let joined = now - Duration::days(365);
        assert_eq!(activity_status(now, joined, None), "inactive");
        let last_order = now - Duration::days(60);
        assert_eq!(activity_status(now, joined, Some(last_order)), "inactive");
    }
}
