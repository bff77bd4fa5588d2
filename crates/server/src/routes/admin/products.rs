//! Admin catalog management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use suya_core::{ProductCategory, ProductId};

use crate::db::ProductRepository;
use crate::db::products::ProductInput;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::products::ProductDto;
use crate::state::AppState;

use super::log_action;

/// Stock level at or below which a product is flagged in the admin list.
const LOW_STOCK_THRESHOLD: i32 = 20;

/// Admin product row with sales info.
#[derive(Debug, Serialize)]
pub struct AdminProductDto {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub category: ProductCategory,
    pub price: f64,
    pub stock: i32,
    pub status: &'static str,
    pub image: Option<String>,
    pub is_active: bool,
    pub sold: i64,
}

/// Create/update request body for a catalog entry.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    /// Derived from the name when absent.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: ProductCategory,
    pub price: f64,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// Turn a product name into a URL slug: lowercase alphanumerics joined by
/// single hyphens.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn validate(request: &ProductRequest) -> Result<(String, Decimal)> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if request.price < 0.0 {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    if request.stock_quantity < 0 {
        return Err(AppError::BadRequest(
            "stock_quantity cannot be negative".to_string(),
        ));
    }

    let slug = match &request.slug {
        Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
        _ => slugify(&request.name),
    };
    if slug.is_empty() {
        return Err(AppError::BadRequest("slug is required".to_string()));
    }

    let price = Decimal::from_f64_retain(request.price).unwrap_or_default();
    Ok((slug, price))
}

/// List all products with sales counts, newest first.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let products = ProductRepository::new(state.pool()).list_with_sales().await?;

    let data: Vec<AdminProductDto> = products
        .into_iter()
        .map(|entry| AdminProductDto {
            id: entry.product.id,
            slug: entry.product.slug,
            name: entry.product.name,
            category: entry.product.category,
            price: entry.product.price.to_f64().unwrap_or(0.0),
            stock: entry.product.stock_quantity,
            status: if entry.product.stock_quantity > LOW_STOCK_THRESHOLD {
                "Active"
            } else {
                "Low Stock"
            },
            image: entry.product.image_url,
            is_active: entry.product.is_active,
            sold: entry.times_sold,
        })
        .collect();

    Ok(Json(json!({ "data": data })))
}

/// Create a catalog entry.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<impl IntoResponse> {
    let (slug, price) = validate(&request)?;

    let product = ProductRepository::new(state.pool())
        .create(ProductInput {
            slug: &slug,
            name: request.name.trim(),
            description: request.description.as_deref(),
            category: request.category,
            price,
            stock_quantity: request.stock_quantity,
            image_url: request.image_url.as_deref(),
            is_active: request.is_active,
        })
        .await?;

    log_action(
        &state,
        &admin,
        "product.create",
        "product",
        &product.id.to_string(),
        json!({ "slug": product.slug, "name": product.name }),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": ProductDto::from(product) })),
    ))
}

/// Update a catalog entry.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<serde_json::Value>> {
    let (slug, price) = validate(&request)?;

    let product = ProductRepository::new(state.pool())
        .update(
            id,
            ProductInput {
                slug: &slug,
                name: request.name.trim(),
                description: request.description.as_deref(),
                category: request.category,
                price,
                stock_quantity: request.stock_quantity,
                image_url: request.image_url.as_deref(),
                is_active: request.is_active,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => AppError::Database(other),
        })?;

    log_action(
        &state,
        &admin,
        "product.update",
        "product",
        &product.id.to_string(),
        json!({ "slug": product.slug }),
    )
    .await;

    Ok(Json(json!({ "data": ProductDto::from(product) })))
}

/// Delete a catalog entry that has never been sold.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn remove(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let products = ProductRepository::new(state.pool());

    // Block deletion while order history references the product
    let references = products.order_item_count(id).await?;
    if references > 0 {
        return Err(AppError::Conflict(
            "This product has sales and cannot be deleted. Consider archiving or disabling it."
                .to_string(),
        ));
    }

    products.delete(id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
        other => AppError::Database(other),
    })?;

    log_action(
        &state,
        &admin,
        "product.delete",
        "product",
        &id.to_string(),
        json!({}),
    )
    .await;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Multi-Purpose Spice Mix"), "multi-purpose-spice-mix");
        assert_eq!(slugify("Men's Power Mix"), "men-s-power-mix");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  A   B  "), "a-b");
        assert_eq!(slugify("a---b"), "a-b");
    }

    #[test]
    fn test_slugify_strips_non_ascii() {
        assert_eq!(slugify("Pépper Söup!"), "p-pper-s-up");
        assert_eq!(slugify("!!!"), "");
    }
}
