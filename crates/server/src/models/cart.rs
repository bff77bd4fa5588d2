//! Cart line model.

use rust_decimal::Decimal;

use suya_core::ProductId;

/// One cart row joined with its product.
///
/// Product fields are read at query time, not denormalized; the cart always
/// reflects the current catalog price and stock.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub slug: String,
    pub stock_quantity: i32,
}
