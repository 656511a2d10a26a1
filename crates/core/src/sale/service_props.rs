//! Property-based tests for the sale engine.
//!
//! - A direct sale either deducts exactly its base units or fails leaving stock untouched.
//! - Cancelling a completed sale restores the stock it took.

use proptest::prelude::*;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::service::SaleService;
use super::types::{RecordedSaleLine, SaleLine, SaleType};
use crate::error::InventoryError;
use crate::ledger::{ProductLedger, ProductState};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_direct_sale_is_exact_or_untouched(
        stock in 0i64..200,
        cantidad in 1i32..20,
        factor in prop_oneof![Just(1), Just(6), Just(12)],
    ) {
        let id = Uuid::new_v4();
        let mut ledger = ProductLedger::new();
        ledger.load(ProductState {
            id,
            nombre: "Producto".to_string(),
            stock,
            preciocompra: dec!(100),
            precioventa: dec!(150),
            margenganancia: dec!(0.5),
            estado: true,
        });

        let line = SaleLine { producto_id: id, presentacion_id: Uuid::new_v4(), cantidad };
        let units = i64::from(cantidad) * i64::from(factor);

        match SaleService::price_line(&mut ledger, &line, factor, SaleType::VentaDirecta) {
            Ok(priced) => {
                prop_assert!(stock >= units);
                prop_assert_eq!(ledger.product(id).unwrap().stock, stock - units);

                let recorded = [RecordedSaleLine { producto_id: id, cantidad, factor_conversion: factor }];
                SaleService::apply_cancellation(&mut ledger, &recorded).unwrap();
                prop_assert_eq!(ledger.product(id).unwrap().stock, stock);
                prop_assert_eq!(priced.unidades, units);
            }
            Err(InventoryError::InsufficientStock { requested, available, .. }) => {
                prop_assert!(stock < units);
                prop_assert_eq!(requested, units);
                prop_assert_eq!(available, stock);
                prop_assert_eq!(ledger.product(id).unwrap().stock, stock);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
