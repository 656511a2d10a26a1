//! Property-based tests for the product ledger.
//!
//! - Stock never goes negative, whatever sequence of operations is applied.
//! - The reported delta always equals final stock minus loaded stock.

use proptest::prelude::*;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::book::ProductLedger;
use super::types::ProductState;

#[derive(Debug, Clone)]
enum Op {
    Increase(i64),
    Decrease(i64),
    DecreaseClamped(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..500).prop_map(Op::Increase),
        (0i64..500).prop_map(Op::Decrease),
        (0i64..500).prop_map(Op::DecreaseClamped),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_stock_never_negative(initial in 0i64..1_000, ops in prop::collection::vec(op(), 0..30)) {
        let id = Uuid::new_v4();
        let mut ledger = ProductLedger::new();
        ledger.load(ProductState {
            id,
            nombre: "Producto".to_string(),
            stock: initial,
            preciocompra: dec!(100),
            precioventa: dec!(150),
            margenganancia: dec!(0.5),
            estado: true,
        });

        let mut expected = initial;
        for op in ops {
            match op {
                Op::Increase(units) => {
                    ledger.increase_stock(id, units).unwrap();
                    expected += units;
                }
                Op::Decrease(units) => {
                    if ledger.decrease_stock(id, units).is_ok() {
                        expected -= units;
                    }
                }
                Op::DecreaseClamped(units) => {
                    expected -= ledger.decrease_stock_clamped(id, units).unwrap();
                }
            }
            prop_assert!(ledger.product(id).unwrap().stock >= 0);
        }

        let stock = ledger.product(id).unwrap().stock;
        prop_assert_eq!(stock, expected);

        let delta: i64 = ledger.changes().iter().map(|c| c.stock_delta).sum();
        prop_assert_eq!(delta, stock - initial);
    }
}
