//! Integration tests for the address book.
//!
//! Requires a running server with a migrated, seeded database.
//! Run with: cargo test -p suya-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use suya_integration_tests::{base_url, client, signup_customer};

async fn create_address(client: &reqwest::Client, is_default: bool) -> Value {
    let resp = client
        .post(format!("{}/api/addresses", base_url()))
        .json(&json!({
            "kind": "shipping",
            "first_name": "Test",
            "last_name": "Customer",
            "address_line1": "12 Allen Avenue",
            "city": "Ikeja",
            "state": "Lagos",
            "is_default": is_default,
        }))
        .send()
        .await
        .expect("Failed to create address");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse address")
}

async fn list_addresses(client: &reqwest::Client) -> Vec<Value> {
    client
        .get(format!("{}/api/addresses", base_url()))
        .send()
        .await
        .expect("Failed to list addresses")
        .json()
        .await
        .expect("Failed to parse addresses")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_missing_required_fields_rejected() {
    let client = client();
    signup_customer(&client).await;

    let resp = client
        .post(format!("{}/api/addresses", base_url()))
        .json(&json!({ "kind": "shipping", "city": "Ikeja" }))
        .send()
        .await
        .expect("Failed to send address");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_at_most_one_default_per_kind() {
    let client = client();
    signup_customer(&client).await;

    let first = create_address(&client, true).await;
    let second = create_address(&client, true).await;

    let addresses = list_addresses(&client).await;
    let defaults: Vec<&Value> = addresses
        .iter()
        .filter(|a| a["is_default"] == true)
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["id"], second["id"]);

    // Flipping the default back via PATCH unsets the current one
    let resp = client
        .patch(format!("{}/api/addresses/{}", base_url(), first["id"]))
        .json(&json!({ "is_default": true }))
        .send()
        .await
        .expect("Failed to patch address");
    assert_eq!(resp.status(), StatusCode::OK);

    let addresses = list_addresses(&client).await;
    let defaults: Vec<&Value> = addresses
        .iter()
        .filter(|a| a["is_default"] == true)
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["id"], first["id"]);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_addresses_are_owner_scoped() {
    let owner = client();
    signup_customer(&owner).await;
    let address = create_address(&owner, false).await;

    let stranger = client();
    signup_customer(&stranger).await;

    // A different user can neither update nor delete it
    let resp = stranger
        .patch(format!("{}/api/addresses/{}", base_url(), address["id"]))
        .json(&json!({ "city": "Abuja" }))
        .send()
        .await
        .expect("Failed to patch address");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = stranger
        .delete(format!("{}/api/addresses/{}", base_url(), address["id"]))
        .send()
        .await
        .expect("Failed to delete address");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
