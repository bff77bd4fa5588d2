//! Money formatting helpers.
//!
//! Prices are stored as `NUMERIC` columns and carried as [`rust_decimal::Decimal`]
//! in Rust. Display formatting follows the storefront convention: naira sign,
//! thousands separators, no kobo digits.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Format an amount as naira for receipts and emails, e.g. `₦15,000`.
///
/// The amount is rounded to whole naira; negative amounts keep their sign.
#[must_use]
pub fn format_naira(amount: Decimal) -> String {
    let rounded = amount.round().to_i64().unwrap_or(0);
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-₦{grouped}")
    } else {
        format!("₦{grouped}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_format_whole_amounts() {
        assert_eq!(format_naira(Decimal::new(0, 0)), "₦0");
        assert_eq!(format_naira(Decimal::new(500, 0)), "₦500");
        assert_eq!(format_naira(Decimal::new(15_000, 0)), "₦15,000");
        assert_eq!(format_naira(Decimal::new(1_234_567, 0)), "₦1,234,567");
    }

    #[test]
    fn test_format_rounds_kobo() {
        // 15000.50 rounds to 15001 (banker's rounding rounds .5 to even,
        // but 15000.50 -> 15000 under midpoint-to-even; use .75 to be explicit)
        assert_eq!(format_naira(Decimal::new(1_500_075, 2)), "₦15,001");
        assert_eq!(format_naira(Decimal::new(1_500_025, 2)), "₦15,000");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_naira(Decimal::new(-2_500, 0)), "-₦2,500");
    }
}
