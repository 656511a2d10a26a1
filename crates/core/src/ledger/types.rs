//! Product ledger types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock and price state of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductState {
    /// Product ID.
    pub id: Uuid,
    /// Product name.
    pub nombre: String,
    /// Stock in base units.
    pub stock: i64,
    /// Cost of one base unit.
    pub preciocompra: Decimal,
    /// Sale price of one base unit.
    pub precioventa: Decimal,
    /// Margin as a fraction.
    pub margenganancia: Decimal,
    /// Whether the product can be sold.
    pub estado: bool,
}

/// New cost and sale price of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceUpdate {
    /// Cost of one base unit.
    pub preciocompra: Decimal,
    /// Sale price of one base unit.
    pub precioventa: Decimal,
}

/// Net effect of an operation on one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerChange {
    /// Product ID.
    pub product_id: Uuid,
    /// Net stock delta in base units.
    pub stock_delta: i64,
    /// Final prices, if they were written.
    pub price: Option<PriceUpdate>,
}

impl LedgerChange {
    /// Base units that must be on hand for the change to apply.
    #[must_use]
    pub const fn required_stock(&self) -> i64 {
        if self.stock_delta < 0 {
            -self.stock_delta
        } else {
            0
        }
    }
}
