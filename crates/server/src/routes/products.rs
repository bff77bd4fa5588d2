//! Public catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use suya_core::{ProductCategory, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Catalog query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
}

/// Product shape returned to the client: decimals become plain numbers so
/// the JSON is directly usable without a decimal library.
#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub category: ProductCategory,
    pub price: f64,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            slug: product.slug,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price.to_f64().unwrap_or(0.0),
            stock_quantity: product.stock_quantity,
            image_url: product.image_url,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// List active products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductDto>>> {
    let category = query
        .category
        .as_deref()
        .map(str::parse::<ProductCategory>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let products = ProductRepository::new(state.pool())
        .list_active(category)
        .await?;

    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// Get one active product by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDto>> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductDto::from(product)))
}
