//! Property-based tests for the pricing calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{COP_ROUNDING_STEP, compute_sale_price, normalize_margin_value, round_cop};

/// Strategy to generate non-negative costs (0.00 to 1,000,000.00).
fn cost() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate margin fractions (0.0000 to 2.0000).
fn margin() -> impl Strategy<Value = Decimal> {
    (0i64..20_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Rounded prices are multiples of 50, never below the input, and less than
    /// one step above it.
    #[test]
    fn prop_round_cop_is_smallest_multiple(value in cost()) {
        let rounded = round_cop(value).unwrap();
        prop_assert_eq!(rounded % COP_ROUNDING_STEP, Decimal::ZERO);
        prop_assert!(rounded >= value);
        prop_assert!(rounded - value < COP_ROUNDING_STEP);
    }

    /// Rounding is idempotent.
    #[test]
    fn prop_round_cop_idempotent(value in cost()) {
        let once = round_cop(value).unwrap();
        prop_assert_eq!(round_cop(once), Some(once));
    }

    /// The sale price covers cost plus margin.
    #[test]
    fn prop_sale_price_covers_margin(c in cost(), m in margin()) {
        let price = compute_sale_price(c, m).unwrap();
        prop_assert!(price >= c * (Decimal::ONE + m));
        prop_assert!(price >= c);
    }

    /// Margins above one are read as percentage points.
    #[test]
    fn prop_percent_points_become_fractions(points in 101i64..10_000i64) {
        let normalized = normalize_margin_value(Decimal::from(points)).unwrap();
        prop_assert_eq!(normalized, Decimal::new(points, 2));
        prop_assert!(normalized > Decimal::ONE);
    }
}
