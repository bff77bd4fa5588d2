//! Integration tests for the cart API.
//!
//! Requires a running server with a migrated, seeded database.
//! Run with: cargo test -p suya-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use suya_integration_tests::{base_url, client, first_product, signup_customer};

async fn cart_items(client: &reqwest::Client) -> Vec<Value> {
    let body: Value = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to parse cart");
    body["items"].as_array().expect("items missing").clone()
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cart_requires_auth() {
    let anon = client();
    let resp = anon
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_adding_same_product_twice_increments_one_row() {
    let client = client();
    signup_customer(&client).await;
    let product = first_product(&client).await;
    let product_id = product["id"].clone();

    for _ in 0..2 {
        let resp = client
            .post(format!("{}/api/cart", base_url()))
            .json(&json!({ "product_id": product_id, "quantity": 1 }))
            .send()
            .await
            .expect("Failed to add to cart");
        assert!(resp.status().is_success());
    }

    // Exactly one row for (user, product) with quantity 2
    let items = cart_items(&client).await;
    let matching: Vec<&Value> = items
        .iter()
        .filter(|item| item["product_id"] == product_id)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_setting_quantity_to_zero_removes_line() {
    let client = client();
    signup_customer(&client).await;
    let product = first_product(&client).await;
    let product_id = product["id"].clone();

    client
        .post(format!("{}/api/cart", base_url()))
        .json(&json!({ "product_id": product_id, "quantity": 3 }))
        .send()
        .await
        .expect("Failed to add to cart");

    let resp = client
        .put(format!("{}/api/cart", base_url()))
        .json(&json!({ "product_id": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to update cart");
    assert!(resp.status().is_success());

    assert!(cart_items(&client).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_product_rejected() {
    let client = client();
    signup_customer(&client).await;

    let resp = client
        .post(format!("{}/api/cart", base_url()))
        .json(&json!({ "product_id": 999_999_999, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_clear_empties_cart() {
    let client = client();
    signup_customer(&client).await;
    let product = first_product(&client).await;

    client
        .post(format!("{}/api/cart", base_url()))
        .json(&json!({ "product_id": product["id"], "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");

    let resp = client
        .delete(format!("{}/api/cart/clear", base_url()))
        .send()
        .await
        .expect("Failed to clear cart");
    assert!(resp.status().is_success());

    assert!(cart_items(&client).await.is_empty());
}
