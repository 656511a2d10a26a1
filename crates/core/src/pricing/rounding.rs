//! Colombian peso rounding.

use rust_decimal::Decimal;

/// Prices are rounded up to a multiple of this many pesos.
pub const COP_ROUNDING_STEP: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Rounds up to the nearest multiple of 50.
///
/// Values already on a multiple of 50 are returned unchanged. Returns `None`
/// when the rounded value does not fit a `Decimal`.
#[must_use]
pub fn round_cop(value: Decimal) -> Option<Decimal> {
    (value / COP_ROUNDING_STEP).ceil().checked_mul(COP_ROUNDING_STEP)
}
