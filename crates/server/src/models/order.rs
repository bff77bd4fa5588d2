//! Order and order item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use suya_core::{OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};

/// Denormalized shipping address stored on the order itself.
///
/// Not a foreign key to the address book: editing a saved address must never
/// rewrite where a past order was shipped.
#[derive(Debug, Clone, Default)]
pub struct ShippingDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl ShippingDetails {
    /// Recipient name for receipts, falling back to `None` when both parts
    /// are absent.
    #[must_use]
    pub fn recipient(&self) -> Option<String> {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();
        if name.is_empty() { None } else { Some(name) }
    }

    /// Single-line address summary for receipts.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.address_line1.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// A placed order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub currency: String,
    pub total_amount: Decimal,
    pub shipping_amount: Decimal,
    pub tax_amount: Decimal,
    pub shipping: ShippingDetails,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line on a placed order.
///
/// Product name and price are denormalized at purchase time so later catalog
/// edits do not rewrite order history; the line stays readable on its own
/// even for rows whose `product_id` is absent.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i32,
    pub total_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_joins_names() {
        let shipping = ShippingDetails {
            first_name: Some("Adaeze".to_string()),
            last_name: Some("Okafor".to_string()),
            ..ShippingDetails::default()
        };
        assert_eq!(shipping.recipient().as_deref(), Some("Adaeze Okafor"));
    }

    #[test]
    fn test_recipient_empty_when_blank() {
        assert!(ShippingDetails::default().recipient().is_none());
    }

    #[test]
    fn test_summary_skips_missing_parts() {
        let shipping = ShippingDetails {
            address_line1: Some("12 Allen Avenue".to_string()),
            city: Some("Ikeja".to_string()),
            state: None,
            country: Some("Nigeria".to_string()),
            ..ShippingDetails::default()
        };
        assert_eq!(
            shipping.summary().as_deref(),
            Some("12 Allen Avenue, Ikeja, Nigeria")
        );
    }
}
