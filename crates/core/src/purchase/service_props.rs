//! Property-based tests for the purchase engine.
//!
//! - Applying a purchase adds exactly Σ(cantidad × factor) base units per product.
//! - Cancelling it right away restores stock and prices to their loaded values.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::service::PurchaseService;
use super::types::{PurchaseLine, RecordedPurchaseLine};
use crate::ledger::{ProductLedger, ProductState};

/// (product slot, quantity, factor, unit price in cents)
fn line_spec() -> impl Strategy<Value = (usize, i32, i32, i64)> {
    (0usize..3, 1i32..50, prop_oneof![Just(1), Just(6), Just(12), Just(30)], 100i64..500_000)
}

fn products() -> Vec<ProductState> {
    (0i64..3)
        .map(|i| ProductState {
            id: Uuid::new_v4(),
            nombre: format!("Producto {i}"),
            stock: i * 10,
            preciocompra: dec!(500),
            precioventa: dec!(650),
            margenganancia: dec!(0.3),
            estado: true,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_purchase_then_cancel_round_trips(specs in prop::collection::vec(line_spec(), 1..8)) {
        let catalog = products();
        let mut ledger = ProductLedger::new();
        for product in &catalog {
            ledger.load(product.clone());
        }

        let mut applied = Vec::new();
        let mut expected_units = [0i64; 3];
        for (position, (slot, cantidad, factor, cents)) in specs.into_iter().enumerate() {
            let line = PurchaseLine {
                producto_id: catalog[slot].id,
                presentacion_id: Uuid::new_v4(),
                cantidad,
                subtotal: Decimal::from(cantidad) * Decimal::new(cents, 2),
            };
            let position = i32::try_from(position).unwrap();
            applied.push(PurchaseService::apply_line(&mut ledger, &line, factor, position).unwrap());
            expected_units[slot] += i64::from(cantidad) * i64::from(factor);
        }

        for (slot, product) in catalog.iter().enumerate() {
            prop_assert_eq!(
                ledger.product(product.id).unwrap().stock,
                product.stock + expected_units[slot]
            );
        }

        let recorded: Vec<RecordedPurchaseLine> = applied
            .iter()
            .map(|line| RecordedPurchaseLine {
                producto_id: line.producto_id,
                posicion: line.posicion,
                cantidad: line.cantidad,
                factor_conversion: line.factor_conversion,
                preciocompra_anterior: line.preciocompra_anterior,
                precioventa_anterior: line.precioventa_anterior,
            })
            .collect();
        PurchaseService::apply_cancellation(&mut ledger, &recorded).unwrap();

        for product in &catalog {
            prop_assert_eq!(ledger.product(product.id).unwrap(), product);
        }
    }
}
