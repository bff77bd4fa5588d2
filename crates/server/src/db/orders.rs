//! Order repository.
//!
//! Placement writes (order row, line items, cart clear, visitor promotion)
//! run inside one transaction so a crash can never leave an order placed with
//! a surviving cart or a stale role.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use suya_core::{OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, ShippingDetails};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: Option<i32>,
    order_number: String,
    status: String,
    payment_status: String,
    payment_method: Option<String>,
    payment_reference: Option<String>,
    currency: String,
    total_amount: Decimal,
    shipping_amount: Decimal,
    tax_amount: Decimal,
    shipping_first_name: Option<String>,
    shipping_last_name: Option<String>,
    shipping_address_line1: Option<String>,
    shipping_address_line2: Option<String>,
    shipping_city: Option<String>,
    shipping_state: Option<String>,
    shipping_postal_code: Option<String>,
    shipping_country: Option<String>,
    shipping_phone: Option<String>,
    tracking_number: Option<String>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_status: PaymentStatus = self.payment_status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: self.user_id.map(UserId::new),
            order_number: self.order_number,
            status,
            payment_status,
            payment_method: self.payment_method,
            payment_reference: self.payment_reference,
            currency: self.currency,
            total_amount: self.total_amount,
            shipping_amount: self.shipping_amount,
            tax_amount: self.tax_amount,
            shipping: ShippingDetails {
                first_name: self.shipping_first_name,
                last_name: self.shipping_last_name,
                address_line1: self.shipping_address_line1,
                address_line2: self.shipping_address_line2,
                city: self.shipping_city,
                state: self.shipping_state,
                postal_code: self.shipping_postal_code,
                country: self.shipping_country,
                phone: self.shipping_phone,
            },
            tracking_number: self.tracking_number,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    product_name: String,
    product_price: Decimal,
    quantity: i32,
    total_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            product_price: row.product_price,
            quantity: row.quantity,
            total_price: row.total_price,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, order_number, status, payment_status, payment_method, \
     payment_reference, currency, total_amount, shipping_amount, tax_amount, \
     shipping_first_name, shipping_last_name, shipping_address_line1, shipping_address_line2, \
     shipping_city, shipping_state, shipping_postal_code, shipping_country, shipping_phone, \
     tracking_number, shipped_at, delivered_at, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, product_price, quantity, total_price";

/// One denormalized line of a new order.
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// Everything needed to place an order.
pub struct NewOrder<'a> {
    pub user_id: UserId,
    pub order_number: &'a str,
    pub tracking_number: &'a str,
    pub payment_method: Option<&'a str>,
    pub payment_reference: Option<&'a str>,
    pub currency: &'a str,
    pub total_amount: Decimal,
    pub shipping_amount: Decimal,
    pub tax_amount: Decimal,
    pub shipping: &'a ShippingDetails,
    pub items: Vec<NewOrderItem>,
}

/// An order joined with its customer for the admin listing.
pub struct AdminOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// Dashboard summary of a recent order.
pub struct RecentOrderSummary {
    pub order_number: String,
    pub customer: String,
    pub product_summary: String,
    pub amount: Decimal,
    pub status: OrderStatus,
}

/// Per-user order statistics.
pub struct UserOrderStats {
    pub total_orders: i64,
    /// Sum over paid orders only, so refunds and failures don't inflate it.
    pub total_spent: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order atomically.
    ///
    /// Inserts the order and its items, clears the user's cart, and promotes
    /// a `visitor` to `customer`, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        new_order: NewOrder<'_>,
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders
                 (user_id, order_number, status, payment_status, payment_method,
                  payment_reference, currency, total_amount, shipping_amount, tax_amount,
                  shipping_first_name, shipping_last_name, shipping_address_line1,
                  shipping_address_line2, shipping_city, shipping_state, shipping_postal_code,
                  shipping_country, shipping_phone, tracking_number)
             VALUES ($1, $2, 'pending', 'paid', $3, $4, $5, $6, $7, $8,
                     $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_order.user_id.as_i32())
        .bind(new_order.order_number)
        .bind(new_order.payment_method)
        .bind(new_order.payment_reference)
        .bind(new_order.currency)
        .bind(new_order.total_amount)
        .bind(new_order.shipping_amount)
        .bind(new_order.tax_amount)
        .bind(new_order.shipping.first_name.as_deref())
        .bind(new_order.shipping.last_name.as_deref())
        .bind(new_order.shipping.address_line1.as_deref())
        .bind(new_order.shipping.address_line2.as_deref())
        .bind(new_order.shipping.city.as_deref())
        .bind(new_order.shipping.state.as_deref())
        .bind(new_order.shipping.postal_code.as_deref())
        .bind(new_order.shipping.country.as_deref())
        .bind(new_order.shipping.phone.as_deref())
        .bind(new_order.tracking_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let order = order_row.into_order()?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_items
                     (order_id, product_id, product_name, product_price, quantity, total_price)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {ORDER_ITEM_COLUMNS}"
            ))
            .bind(order.id.as_i32())
            .bind(item.product_id.as_i32())
            .bind(&item.product_name)
            .bind(item.product_price)
            .bind(item.quantity)
            .bind(item.total_price)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem::from(item_row));
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(new_order.user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET role = 'customer', updated_at = NOW() \
                     WHERE id = $1 AND role = 'visitor'")
            .bind(new_order.user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((order, items))
    }

    async fn items_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items
             WHERE order_id = ANY($1)
             ORDER BY order_id, id"
        ))
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    fn zip_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<(Order, Vec<OrderItem>)> {
        let mut by_order: std::collections::HashMap<OrderId, Vec<OrderItem>> =
            std::collections::HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                (order, items)
            })
            .collect()
    }

    /// List a user's orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list_by_user(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<(Order, Vec<OrderItem>)>, RepositoryError> {
        let rows = match limit {
            Some(limit) => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders
                     WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
                ))
                .bind(user_id.as_i32())
                .bind(limit)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders
                     WHERE user_id = $1 ORDER BY created_at DESC"
                ))
                .bind(user_id.as_i32())
                .fetch_all(self.pool)
                .await?
            }
        };

        let orders: Vec<Order> = rows
            .into_iter()
            .map(OrderRow::into_order)
            .collect::<Result<_, _>>()?;
        let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let items = self.items_for_orders(&ids).await?;

        Ok(Self::zip_items(orders, items))
    }

    /// Get one order with its items by order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(order_number)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = row.into_order()?;
        let items = self.items_for_orders(&[order.id.as_i32()]).await?;

        Ok(Some((order, items)))
    }

    /// List every order with customer info and items, newest first (admin).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminOrder>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            order: OrderRow,
            user_name: Option<String>,
            user_email: Option<String>,
        }

        let rows = sqlx::query_as::<_, Row>(
            "SELECT o.id, o.user_id, o.order_number, o.status, o.payment_status,
                    o.payment_method, o.payment_reference, o.currency, o.total_amount,
                    o.shipping_amount, o.tax_amount, o.shipping_first_name,
                    o.shipping_last_name, o.shipping_address_line1, o.shipping_address_line2,
                    o.shipping_city, o.shipping_state, o.shipping_postal_code,
                    o.shipping_country, o.shipping_phone, o.tracking_number, o.shipped_at,
                    o.delivered_at, o.created_at, o.updated_at,
                    u.name AS user_name, u.email AS user_email
             FROM orders o
             LEFT JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        let mut meta = Vec::with_capacity(rows.len());
        for row in rows {
            meta.push((row.user_name, row.user_email));
            orders.push(row.order.into_order()?);
        }

        let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let items = self.items_for_orders(&ids).await?;
        let zipped = Self::zip_items(orders, items);

        Ok(zipped
            .into_iter()
            .zip(meta)
            .map(|((order, items), (user_name, user_email))| AdminOrder {
                order,
                items,
                user_name,
                user_email,
            })
            .collect())
    }

    /// Move an order through the lifecycle state machine.
    ///
    /// The current status is read under a row lock and the transition is
    /// validated before anything is written. `shipped_at`/`delivered_at` are
    /// stamped only when still unset, so replays never rewrite history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Conflict` if the transition is illegal.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn transition_status(
        &self,
        id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, String>(
            "SELECT status FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let current: OrderStatus = current.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        if !current.can_transition_to(next) {
            return Err(RepositoryError::Conflict(format!(
                "order cannot move from {current} to {next}"
            )));
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders
             SET status = $2,
                 shipped_at = CASE
                     WHEN $2 = 'shipped' AND shipped_at IS NULL THEN NOW()
                     ELSE shipped_at
                 END,
                 delivered_at = CASE
                     WHEN $2 = 'delivered' AND delivered_at IS NULL THEN NOW()
                     ELSE delivered_at
                 END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(next.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.into_order()
    }

    /// Set an order's tracking number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_tracking(
        &self,
        id: OrderId,
        tracking_number: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET tracking_number = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(tracking_number)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Order count and paid spend for one user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn user_stats(&self, user_id: UserId) -> Result<UserOrderStats, RepositoryError> {
        let total_orders =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_one(self.pool)
                .await?;

        let total_spent = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(total_amount) FROM orders
             WHERE user_id = $1 AND payment_status = 'paid'",
        )
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?
        .unwrap_or_default();

        Ok(UserOrderStats {
            total_orders,
            total_spent,
        })
    }

    /// Total units sold across all orders (admin dashboard stat).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_sold(&self) -> Result<i64, RepositoryError> {
        let sold = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT SUM(quantity)::BIGINT FROM order_items",
        )
        .fetch_one(self.pool)
        .await?
        .unwrap_or(0);
        Ok(sold)
    }

    /// Count of orders still moving through fulfillment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders
             WHERE status IN ('pending', 'processing', 'shipped')",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Revenue over paid orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn paid_revenue(&self) -> Result<Decimal, RepositoryError> {
        let revenue = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(total_amount) FROM orders WHERE payment_status = 'paid'",
        )
        .fetch_one(self.pool)
        .await?
        .unwrap_or_default();
        Ok(revenue)
    }

    /// The most recent orders, summarized for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn recent_summaries(
        &self,
        limit: i64,
    ) -> Result<Vec<RecentOrderSummary>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            order_number: String,
            customer: String,
            first_item: Option<String>,
            item_count: i64,
            total_amount: Decimal,
            status: String,
        }

        let rows = sqlx::query_as::<_, Row>(
            "SELECT o.order_number,
                    COALESCE(NULLIF(u.name, ''), u.email, 'Guest') AS customer,
                    (SELECT oi.product_name FROM order_items oi
                     WHERE oi.order_id = o.id ORDER BY oi.id LIMIT 1) AS first_item,
                    (SELECT COUNT(*) FROM order_items oi WHERE oi.order_id = o.id) AS item_count,
                    o.total_amount, o.status
             FROM orders o
             LEFT JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let status: OrderStatus = row.status.parse().map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "invalid order status in database: {e}"
                    ))
                })?;

                let first = row.first_item.unwrap_or_else(|| "—".to_string());
                let product_summary = if row.item_count > 1 {
                    format!("{first} +{} more", row.item_count - 1)
                } else {
                    first
                };

                Ok(RecentOrderSummary {
                    order_number: row.order_number,
                    customer: row.customer,
                    product_summary,
                    amount: row.total_amount,
                    status,
                })
            })
            .collect()
    }
}
