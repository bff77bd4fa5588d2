//! Shared helpers for integration tests.
//!
//! These tests require a running server (`cargo run -p suya-server`) with a
//! migrated, seeded database behind it, plus `SUYA_BASE_URL` pointing at it
//! (defaults to `http://localhost:3000`). Every test is `#[ignore]`d so the
//! suite stays green without infrastructure; run them with
//! `cargo test -p suya-integration-tests -- --ignored`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rand::Rng;
use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SUYA_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin credentials used by the seeder, overridable via environment.
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email = std::env::var("SUYA_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@suyahouse.shop".to_string());
    let password =
        std::env::var("SUYA_ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@123".to_string());
    (email, password)
}

/// Build an HTTP client that keeps cookies across requests, so the session
/// cookie set by login flows into subsequent calls.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email per test run.
#[must_use]
pub fn unique_email() -> String {
    let n: u64 = rand::rng().random();
    format!("test-{n:016x}@suyahouse.test")
}

/// Sign up a fresh customer and return its email; the client's cookie jar
/// holds the session afterwards.
///
/// # Panics
///
/// Panics if the signup request fails.
pub async fn signup_customer(client: &Client) -> String {
    let email = unique_email();
    let resp = client
        .post(format!("{}/api/auth/signup", base_url()))
        .json(&json!({
            "name": "Test Customer",
            "email": email,
            "password": "pepper-soup-123",
        }))
        .send()
        .await
        .expect("Failed to sign up");
    assert!(
        resp.status().is_success(),
        "signup failed: {}",
        resp.status()
    );
    email
}

/// Log the seeded admin in on this client.
///
/// # Panics
///
/// Panics if the login request fails.
pub async fn login_admin(client: &Client) {
    let (email, password) = admin_credentials();
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in admin");
    assert!(
        resp.status().is_success(),
        "admin login failed: {}",
        resp.status()
    );
}

/// Fetch the first active product in the catalog.
///
/// # Panics
///
/// Panics if the catalog request fails or the catalog is empty (run the
/// seeder first).
pub async fn first_product(client: &Client) -> Value {
    let products: Vec<Value> = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse products");
    products.into_iter().next().expect("catalog is empty; run suya-cli seed")
}
