//! Product entity definitions and price handling

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tag::Tag;
use crate::types::{DatabaseError, DatabaseResult};

/// Maximum number of digits a price may carry, counting both sides of the
/// decimal point.
pub const PRICE_MAX_DIGITS: u32 = 10;
/// Prices are stored in hundredths.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Product with its tag set resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub tags: Vec<Tag>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    /// Tag names to resolve against the owner's tags.
    pub tags: Vec<String>,
}

/// Partial update. `tags: Some(vec![])` clears the tag set, `None` keeps it.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Converts a price to integer cents, rejecting values written with more
/// than two decimal places (trailing zeros included) or more than ten digits
/// overall.
///
/// ```
/// use rust_decimal::Decimal;
/// use storefront_database::price_to_cents;
///
/// assert_eq!(price_to_cents(Decimal::new(1999, 2)).unwrap(), 1999);
/// assert_eq!(price_to_cents(Decimal::new(10, 0)).unwrap(), 1000);
/// assert!(price_to_cents(Decimal::new(1234, 3)).is_err());
/// ```
pub fn price_to_cents(price: Decimal) -> DatabaseResult<i64> {
    if price.scale() > PRICE_DECIMAL_PLACES {
        return Err(DatabaseError::validation(format!(
            "ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places"
        )));
    }

    let mut value = price;
    value.rescale(PRICE_DECIMAL_PLACES);
    let cents = value.mantissa();
    if cents.unsigned_abs() >= 10u128.pow(PRICE_MAX_DIGITS) {
        return Err(DatabaseError::validation(format!(
            "ensure that there are no more than {PRICE_MAX_DIGITS} digits in total"
        )));
    }

    i64::try_from(cents).map_err(|_| DatabaseError::validation("price is out of range"))
}

/// Reads a stored cent amount back as a two-place decimal.
pub fn price_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_DECIMAL_PLACES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal literal")
    }

    #[test]
    fn rejects_trailing_zeros_beyond_two_places() {
        let err = price_to_cents(dec("5.500")).expect_err("three written places");
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert_eq!(price_to_cents(dec("5.50")).unwrap(), 550);
        assert_eq!(price_to_cents(dec("5.5")).unwrap(), 550);
    }

    #[test]
    fn rejects_third_significant_decimal_place() {
        let err = price_to_cents(dec("5.505")).expect_err("three places");
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[test]
    fn enforces_ten_digit_limit() {
        assert_eq!(price_to_cents(dec("99999999.99")).unwrap(), 9_999_999_999);
        assert!(price_to_cents(dec("100000000.00")).is_err());
    }

    #[test]
    fn stored_cents_render_with_two_places() {
        assert_eq!(price_from_cents(1000).to_string(), "10.00");
        assert_eq!(price_from_cents(1999).to_string(), "19.99");
        assert_eq!(price_from_cents(5).to_string(), "0.05");
    }
}
