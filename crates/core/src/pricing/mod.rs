//! Pricing calculator.
//!
//! Sale prices are derived from the per-base-unit cost and the product margin,
//! then rounded up to the nearest 50 pesos.
//!
//! Margins are always fractions (`0.30` = 30 %). Raw margins from the outside
//! go through [`normalize_margin`] first.

mod margin;
mod rounding;

#[cfg(test)]
mod props;

pub use margin::{normalize_margin, normalize_margin_value};
pub use rounding::{COP_ROUNDING_STEP, round_cop};

use rust_decimal::Decimal;

use crate::error::InventoryError;

/// Computes the sale price for a base-unit cost and a margin fraction.
///
/// `precioventa = round_cop(cost * (1 + margin))`
///
/// # Errors
///
/// Returns `InvalidMargin` for a negative margin and `InvalidField` for a
/// negative cost or a price outside the `Decimal` range.
pub fn compute_sale_price(cost: Decimal, margin: Decimal) -> Result<Decimal, InventoryError> {
    if margin.is_sign_negative() && !margin.is_zero() {
        return Err(InventoryError::InvalidMargin(margin.to_string()));
    }
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(InventoryError::InvalidField {
            field: "preciocompra",
            reason: format!("cost cannot be negative: {cost}"),
        });
    }
    Decimal::ONE
        .checked_add(margin)
        .and_then(|factor| cost.checked_mul(factor))
        .and_then(round_cop)
        .ok_or_else(|| InventoryError::out_of_range("precioventa"))
}
