//! Integration tests for admin authorization and order lifecycle.
//!
//! Requires a running server with a migrated, seeded database (the seeder
//! creates the admin account these tests log in with).
//! Run with: cargo test -p suya-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use suya_integration_tests::{base_url, client, first_product, login_admin, signup_customer};

/// Every admin endpoint a non-admin must bounce off of, with the method and
/// a representative body where one is needed.
const ADMIN_GETS: &[&str] = &[
    "/api/admin/stats",
    "/api/admin/products",
    "/api/admin/orders",
    "/api/admin/customers",
];

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_reads_reject_customers_with_unauthorized() {
    let client = client();
    signup_customer(&client).await;

    for path in ADMIN_GETS {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{path}");
        let body: Value = resp.json().await.expect("Failed to parse body");
        assert_eq!(body["error"], "Unauthorized", "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_mutations_reject_customers_without_mutating() {
    let client = client();
    signup_customer(&client).await;
    let product = first_product(&client).await;
    let product_id = product["id"].as_i64().expect("product id");

    // Attempted delete must be rejected...
    let resp = client
        .delete(format!("{}/api/admin/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "Unauthorized");

    // ...and the product must still be there
    let still_there = client
        .get(format!(
            "{}/api/products/{}",
            base_url(),
            product["slug"].as_str().expect("slug")
        ))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(still_there.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_sold_product_cannot_be_deleted() {
    let customer = client();
    signup_customer(&customer).await;
    let product = first_product(&customer).await;

    // Sell one unit so the product has order history
    let resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&json!({
            "items": [
                { "product_id": product["id"], "name": product["name"], "price": 15000, "quantity": 1 },
            ],
            "total": 15000,
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert!(resp.status().is_success());

    let admin = client();
    login_admin(&admin).await;

    let resp = admin
        .delete(format!(
            "{}/api/admin/products/{}",
            base_url(),
            product["id"]
        ))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert!(
        body["error"]
            .as_str()
            .expect("error message")
            .contains("cannot be deleted")
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_order_lifecycle_rejects_illegal_transitions() {
    let customer = client();
    signup_customer(&customer).await;
    let product = first_product(&customer).await;

    let resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&json!({
            "items": [
                { "product_id": product["id"], "name": product["name"], "price": 15000, "quantity": 1 },
            ],
            "total": 15000,
        }))
        .send()
        .await
        .expect("Failed to place order");
    let body: Value = resp.json().await.expect("Failed to parse order");
    let order_id = body["order"]["id"].as_i64().expect("order id");

    let admin = client();
    login_admin(&admin).await;

    let set_status = |status: &'static str| {
        let admin = admin.clone();
        async move {
            admin
                .patch(format!("{}/api/admin/orders/{order_id}/status", base_url()))
                .json(&json!({ "status": status }))
                .send()
                .await
                .expect("Failed to send status update")
        }
    };

    // Skipping straight to delivered is illegal from pending
    assert_eq!(set_status("delivered").await.status(), StatusCode::CONFLICT);

    // The forward path works
    assert_eq!(set_status("processing").await.status(), StatusCode::OK);
    assert_eq!(set_status("shipped").await.status(), StatusCode::OK);
    assert_eq!(set_status("delivered").await.status(), StatusCode::OK);

    // No going back
    assert_eq!(set_status("pending").await.status(), StatusCode::CONFLICT);

    // Unknown statuses are a client error, not a crash
    assert_eq!(
        set_status("teleported").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_stats_shape() {
    let admin = client();
    login_admin(&admin).await;

    let body: Value = admin
        .get(format!("{}/api/admin/stats", base_url()))
        .send()
        .await
        .expect("Failed to fetch stats")
        .json()
        .await
        .expect("Failed to parse stats");

    let data = &body["data"];
    assert!(data["total_users"].is_i64());
    assert!(data["products_sold"].is_i64());
    assert!(data["active_orders"].is_i64());
    assert!(data["revenue"].is_number());
    assert!(data["recent_orders"].is_array());
}
