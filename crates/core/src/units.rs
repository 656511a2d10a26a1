//! Unit conversion between presentations and base units.
//!
//! Stock is always counted in base units. A presentation ("dozen", "box of 30")
//! carries a `factor_conversion` telling how many base units one presentation
//! unit holds.

use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::error::InventoryError;

/// Decimal places kept for per-base-unit costs.
pub const COST_DECIMAL_PLACES: u32 = 2;

/// A product presentation as seen by the engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationInfo {
    /// Presentation ID.
    pub id: Uuid,
    /// Product the presentation belongs to.
    pub product_id: Uuid,
    /// Base units per presentation unit.
    pub factor_conversion: i32,
}

/// Returns the conversion factor of `presentation_id` for `product_id`.
///
/// The lookup returns `None` when the presentation does not exist.
///
/// # Errors
///
/// Returns `InvalidPresentation` if the presentation is absent, belongs to another
/// product, or carries a non-positive factor.
pub fn resolve_factor<F>(
    product_id: Uuid,
    presentation_id: Uuid,
    lookup: F,
) -> Result<i32, InventoryError>
where
    F: FnOnce(Uuid) -> Option<PresentationInfo>,
{
    let invalid = || InventoryError::InvalidPresentation {
        presentation_id,
        product_id,
    };

    let presentation = lookup(presentation_id).ok_or_else(invalid)?;
    if presentation.product_id != product_id || presentation.factor_conversion <= 0 {
        return Err(invalid());
    }
    Ok(presentation.factor_conversion)
}

/// Converts a quantity of presentation units into base units.
#[must_use]
pub fn to_base_units(cantidad: i32, factor_conversion: i32) -> i64 {
    i64::from(cantidad) * i64::from(factor_conversion)
}

/// Cost of one base unit, given the total paid for `cantidad` presentation units.
///
/// Rounded to [`COST_DECIMAL_PLACES`] with banker's rounding. Returns zero when
/// there are no units.
#[must_use]
pub fn unit_cost(subtotal: Decimal, cantidad: i32, factor_conversion: i32) -> Decimal {
    let units = to_base_units(cantidad, factor_conversion);
    if units <= 0 {
        return Decimal::ZERO;
    }
    (subtotal / Decimal::from(units))
        .round_dp_with_strategy(COST_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dozen(product_id: Uuid) -> PresentationInfo {
        PresentationInfo {
            id: Uuid::new_v4(),
            product_id,
            factor_conversion: 12,
        }
    }

    #[test]
    fn test_resolve_factor() {
        let product_id = Uuid::new_v4();
        let presentation = dozen(product_id);
        let presentation_id = presentation.id;

        let factor = resolve_factor(product_id, presentation_id, |_| Some(presentation));
        assert_eq!(factor.unwrap(), 12);
    }

    #[test]
    fn test_resolve_factor_foreign_product() {
        let product_id = Uuid::new_v4();
        let presentation = dozen(Uuid::new_v4());
        let presentation_id = presentation.id;

        let result = resolve_factor(product_id, presentation_id, |_| Some(presentation));
        assert!(matches!(
            result,
            Err(InventoryError::InvalidPresentation { product_id: p, presentation_id: q })
                if p == product_id && q == presentation_id
        ));
    }

    #[test]
    fn test_resolve_factor_missing() {
        let result = resolve_factor(Uuid::new_v4(), Uuid::new_v4(), |_| None);
        assert!(matches!(
            result,
            Err(InventoryError::InvalidPresentation { .. })
        ));
    }

    #[test]
    fn test_resolve_factor_rejects_zero_factor() {
        let product_id = Uuid::new_v4();
        let mut presentation = dozen(product_id);
        presentation.factor_conversion = 0;
        let presentation_id = presentation.id;

        let result = resolve_factor(product_id, presentation_id, |_| Some(presentation));
        assert!(result.is_err());
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(5, 12), 60);
        assert_eq!(to_base_units(2, 1), 2);
        assert_eq!(to_base_units(i32::MAX, 2), 4_294_967_294);
    }

    #[test]
    fn test_unit_cost() {
        // 5 dozens at 1000 each
        assert_eq!(unit_cost(dec!(5000), 5, 12), dec!(83.33));
        assert_eq!(unit_cost(dec!(3000), 3, 1), dec!(1000));
        assert_eq!(unit_cost(dec!(100), 0, 12), Decimal::ZERO);
    }

    #[test]
    fn test_unit_cost_bankers_rounding() {
        // 0.125 -> 0.12, 0.375 -> 0.38
        assert_eq!(unit_cost(dec!(1), 8, 1), dec!(0.12));
        assert_eq!(unit_cost(dec!(3), 8, 1), dec!(0.38));
    }
}
