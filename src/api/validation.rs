use serde_json::Value;

use super::ApiError;
use crate::constants::inventory::{DEFAULT_PURCHASE_QUANTITY, DEFAULT_RESTOCK_AMOUNT};

/// Reads an integer out of a loosely typed JSON value. Numeric strings are
/// accepted and fractional parts are dropped.
#[must_use]
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < 9.0e15 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn required_text(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{field} is required"))),
    }
}

pub fn parse_price(value: &Value) -> Result<f64, ApiError> {
    match as_number(value) {
        Some(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ApiError::validation(
            "price must be a non-negative number",
        )),
    }
}

/// Stock levels must be whole numbers; `10`, `10.0` and `"10"` are accepted,
/// `2.5` is not.
pub fn parse_stock(value: &Value) -> Result<i64, ApiError> {
    let invalid = || ApiError::validation("quantity must be a non-negative integer");

    let quantity = match value {
        Value::Number(n) => match n.as_i64() {
            Some(q) => q,
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .and_then(truncate)
                .ok_or_else(invalid)?,
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if quantity < 0 {
        return Err(invalid());
    }
    Ok(quantity)
}

/// Optional price bound from the query string. Blank means absent.
pub fn parse_price_bound(field: &str, value: Option<&str>) -> Result<Option<f64>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ApiError::validation(format!("{field} must be a number"))),
    }
}

/// Blank query parameters are treated as absent.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn purchase_quantity(value: Option<&Value>) -> Result<i64, ApiError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(DEFAULT_PURCHASE_QUANTITY);
    };

    match coerce_integer(value) {
        Some(quantity) if quantity >= 1 => Ok(quantity),
        _ => Err(ApiError::invalid_quantity(
            "Quantity must be a positive integer",
        )),
    }
}

/// Restock amount; values that are missing or not numeric fall back to the
/// default amount.
pub fn restock_amount(value: Option<&Value>) -> Result<i64, ApiError> {
    let amount = value
        .and_then(coerce_integer)
        .unwrap_or(DEFAULT_RESTOCK_AMOUNT);

    if amount < 1 {
        return Err(ApiError::invalid_quantity(
            "Restock amount must be a positive integer",
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(&json!(3)), Some(3));
        assert_eq!(coerce_integer(&json!("4")), Some(4));
        assert_eq!(coerce_integer(&json!(2.9)), Some(2));
        assert_eq!(coerce_integer(&json!(" 5 ")), Some(5));
        assert_eq!(coerce_integer(&json!("abc")), None);
        assert_eq!(coerce_integer(&json!(true)), None);
        assert_eq!(coerce_integer(&Value::Null), None);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(&json!(1.5)).unwrap(), 1.5);
        assert_eq!(parse_price(&json!("2.25")).unwrap(), 2.25);
        assert_eq!(parse_price(&json!(0)).unwrap(), 0.0);
        assert!(parse_price(&json!(-1)).is_err());
        assert!(parse_price(&json!("cheap")).is_err());
        assert!(parse_price(&Value::Null).is_err());
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock(&json!(10)).unwrap(), 10);
        assert_eq!(parse_stock(&json!(10.0)).unwrap(), 10);
        assert_eq!(parse_stock(&json!("7")).unwrap(), 7);
        assert_eq!(parse_stock(&json!(0)).unwrap(), 0);
        assert!(parse_stock(&json!(2.5)).is_err());
        assert!(parse_stock(&json!(-3)).is_err());
        assert!(parse_stock(&json!("lots")).is_err());
    }

    #[test]
    fn test_parse_price_bound() {
        assert_eq!(parse_price_bound("minPrice", None).unwrap(), None);
        assert_eq!(parse_price_bound("minPrice", Some("  ")).unwrap(), None);
        assert_eq!(parse_price_bound("minPrice", Some("1.5")).unwrap(), Some(1.5));
        assert!(parse_price_bound("minPrice", Some("abc")).is_err());
    }

    #[test]
    fn test_purchase_quantity() {
        assert_eq!(purchase_quantity(None).unwrap(), 1);
        assert_eq!(purchase_quantity(Some(&Value::Null)).unwrap(), 1);
        assert_eq!(purchase_quantity(Some(&json!(3))).unwrap(), 3);
        assert_eq!(purchase_quantity(Some(&json!(2.7))).unwrap(), 2);
        assert!(matches!(
            purchase_quantity(Some(&json!(0))),
            Err(ApiError::InvalidQuantity(_))
        ));
        assert!(matches!(
            purchase_quantity(Some(&json!("abc"))),
            Err(ApiError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_restock_amount() {
        assert_eq!(restock_amount(None).unwrap(), 10);
        assert_eq!(restock_amount(Some(&json!("abc"))).unwrap(), 10);
        assert_eq!(restock_amount(Some(&json!(20))).unwrap(), 20);
        assert!(matches!(
            restock_amount(Some(&json!(0))),
            Err(ApiError::InvalidQuantity(_))
        ));
        assert!(restock_amount(Some(&json!(-5))).is_err());
    }
}
