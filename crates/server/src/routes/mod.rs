//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/signup             - Create account, set session cookie
//! POST /api/auth/login              - Verify credentials, set session cookie
//! POST /api/auth/logout             - Clear session cookie
//! GET  /api/auth/me                 - Current session user
//! POST /api/auth/forgot-password    - Send reset email (always succeeds)
//! POST /api/auth/reset-password     - Consume reset token, set new password
//!
//! # Catalog
//! GET  /api/products                - Active products (?category=)
//! GET  /api/products/{slug}         - One active product
//!
//! # Checkout
//! GET  /api/checkout/config         - Gateway public key for the client
//!
//! # Cart (requires auth)
//! GET    /api/cart                  - Cart with product data
//! POST   /api/cart                  - Add item (upsert, quantity increments)
//! PUT    /api/cart                  - Set quantity (0 removes)
//! DELETE /api/cart?product_id=      - Remove one line
//! DELETE /api/cart/clear            - Empty the cart
//!
//! # Orders (requires auth)
//! POST /api/orders                          - Place order from payment success
//! GET  /api/orders                          - Order history
//! GET  /api/orders/recent?limit=            - Most recent orders (1..=20)
//! GET  /api/orders/stats                    - Order count + paid spend
//! GET  /api/orders/{order_number}/receipt   - PDF receipt (owner or admin)
//!
//! # Addresses (requires auth)
//! GET    /api/addresses             - Address book
//! POST   /api/addresses             - Create (clears sibling defaults)
//! PATCH  /api/addresses/{id}        - Partial update
//! DELETE /api/addresses/{id}        - Delete
//!
//! # Admin (requires admin role)
//! GET    /api/admin/stats                    - Dashboard numbers
//! GET    /api/admin/products                 - Catalog with sales counts
//! POST   /api/admin/products                 - Create product
//! PUT    /api/admin/products/{id}            - Update product
//! DELETE /api/admin/products/{id}            - Delete (blocked if ever sold)
//! GET    /api/admin/orders                   - All orders
//! PATCH  /api/admin/orders/{id}/status       - Lifecycle transition
//! PATCH  /api/admin/orders/{id}/tracking     - Set tracking number
//! GET    /api/admin/customers                - Customers with aggregates
//! GET    /api/admin/customers/{id}           - Customer detail
//! ```

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart::show)
                .post(cart::add)
                .put(cart::update)
                .delete(cart::remove),
        )
        .route("/clear", delete(cart::clear))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/recent", get(orders::recent))
        .route("/stats", get(orders::stats))
        .route("/{order_number}/receipt", get(orders::receipt))
}

/// Create the address-book routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route(
            "/{id}",
            axum::routing::patch(addresses::update).delete(addresses::remove),
        )
}

/// Create the admin back-office routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats::dashboard))
        .route(
            "/products",
            get(admin::products::index).post(admin::products::create),
        )
        .route(
            "/products/{id}",
            put(admin::products::update).delete(admin::products::remove),
        )
        .route("/orders", get(admin::orders::index))
        .route(
            "/orders/{id}/status",
            axum::routing::patch(admin::orders::update_status),
        )
        .route(
            "/orders/{id}/tracking",
            axum::routing::patch(admin::orders::update_tracking),
        )
        .route("/customers", get(admin::customers::index))
        .route("/customers/{id}", get(admin::customers::show))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/checkout/config", get(checkout::config))
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/addresses", address_routes())
        .nest("/api/admin", admin_routes())
}
