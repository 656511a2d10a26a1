//! Margin normalization.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::InventoryError;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Parses a raw margin and returns it as a fraction.
///
/// Accepts `"30%"`, `"30,5"`, `"0.3"`, and `"30"`. Values above 1 are read as
/// percentage points.
///
/// # Errors
///
/// Returns `InvalidMargin` if the input is empty, not a number, or negative.
pub fn normalize_margin(raw: &str) -> Result<Decimal, InventoryError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(InventoryError::InvalidMargin(raw.to_string()));
    }

    let value =
        Decimal::from_str(&cleaned).map_err(|_| InventoryError::InvalidMargin(raw.to_string()))?;
    normalize_margin_value(value)
}

/// Normalizes a numeric margin to a fraction.
///
/// # Errors
///
/// Returns `InvalidMargin` if the value is negative.
pub fn normalize_margin_value(value: Decimal) -> Result<Decimal, InventoryError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InventoryError::InvalidMargin(value.to_string()));
    }
    let fraction = if value > Decimal::ONE {
        value / ONE_HUNDRED
    } else {
        value
    };
    Ok(fraction.normalize())
}
