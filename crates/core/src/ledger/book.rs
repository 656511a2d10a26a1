//! In-memory product ledger.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use super::types::{LedgerChange, PriceUpdate, ProductState};
use crate::error::InventoryError;

#[derive(Debug, Clone)]
struct Entry {
    loaded_stock: i64,
    state: ProductState,
    price_written: bool,
}

/// Working set of products for one operation.
///
/// Mutations are visible to later lines of the same operation, so two lines
/// touching the same product compose. Nothing here is persisted: callers
/// read [`changes`](Self::changes) and write them inside their transaction.
#[derive(Debug, Clone, Default)]
pub struct ProductLedger {
    entries: Vec<Entry>,
    index: HashMap<Uuid, usize>,
}

impl ProductLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a product. Loading an already present product keeps the working state.
    pub fn load(&mut self, product: ProductState) {
        if self.index.contains_key(&product.id) {
            return;
        }
        self.index.insert(product.id, self.entries.len());
        self.entries.push(Entry {
            loaded_stock: product.stock,
            state: product,
            price_written: false,
        });
    }

    /// Returns true if the product is loaded.
    #[must_use]
    pub fn contains(&self, product_id: Uuid) -> bool {
        self.index.contains_key(&product_id)
    }

    /// Returns the current state of a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product was never loaded.
    pub fn product(&self, product_id: Uuid) -> Result<&ProductState, InventoryError> {
        self.index
            .get(&product_id)
            .map(|&i| &self.entries[i].state)
            .ok_or(InventoryError::ProductNotFound(product_id))
    }

    fn entry_mut(&mut self, product_id: Uuid) -> Result<&mut Entry, InventoryError> {
        let i = *self
            .index
            .get(&product_id)
            .ok_or(InventoryError::ProductNotFound(product_id))?;
        Ok(&mut self.entries[i])
    }

    /// Adds base units to a product's stock.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product is not loaded, `InvalidField` for a
    /// negative amount, or `Internal` on overflow.
    pub fn increase_stock(&mut self, product_id: Uuid, units: i64) -> Result<(), InventoryError> {
        check_units(units)?;
        let entry = self.entry_mut(product_id)?;
        entry.state.stock = entry
            .state
            .stock
            .checked_add(units)
            .ok_or_else(|| InventoryError::Internal(format!("stock overflow for {product_id}")))?;
        debug!(%product_id, units, stock = entry.state.stock, "Stock increased");
        Ok(())
    }

    /// Removes base units from a product's stock.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` if fewer than `units` are on hand; the stock is
    /// left unchanged.
    pub fn decrease_stock(&mut self, product_id: Uuid, units: i64) -> Result<(), InventoryError> {
        check_units(units)?;
        let entry = self.entry_mut(product_id)?;
        if entry.state.stock < units {
            return Err(InventoryError::InsufficientStock {
                product_id,
                requested: units,
                available: entry.state.stock,
            });
        }
        entry.state.stock -= units;
        debug!(%product_id, units, stock = entry.state.stock, "Stock decreased");
        Ok(())
    }

    /// Removes up to `units` base units, never going below zero.
    ///
    /// Returns the number of units actually removed.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product is not loaded.
    pub fn decrease_stock_clamped(
        &mut self,
        product_id: Uuid,
        units: i64,
    ) -> Result<i64, InventoryError> {
        check_units(units)?;
        let entry = self.entry_mut(product_id)?;
        let removed = units.min(entry.state.stock.max(0));
        entry.state.stock -= removed;
        debug!(%product_id, units, removed, stock = entry.state.stock, "Stock decreased (clamped)");
        Ok(removed)
    }

    /// Overwrites a product's cost and sale price.
    ///
    /// # Errors
    ///
    /// Returns `NegativePrice` if either value is negative.
    pub fn set_cost_and_price(
        &mut self,
        product_id: Uuid,
        preciocompra: Decimal,
        precioventa: Decimal,
    ) -> Result<(), InventoryError> {
        for price in [preciocompra, precioventa] {
            if price < Decimal::ZERO {
                return Err(InventoryError::NegativePrice { product_id, price });
            }
        }
        let entry = self.entry_mut(product_id)?;
        entry.state.preciocompra = preciocompra;
        entry.state.precioventa = precioventa;
        entry.price_written = true;
        Ok(())
    }

    /// Returns the net effect per touched product, in load order.
    ///
    /// Products whose stock and prices were never written are omitted.
    #[must_use]
    pub fn changes(&self) -> Vec<LedgerChange> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let stock_delta = entry.state.stock - entry.loaded_stock;
                let price = entry.price_written.then_some(PriceUpdate {
                    preciocompra: entry.state.preciocompra,
                    precioventa: entry.state.precioventa,
                });
                (stock_delta != 0 || price.is_some()).then_some(LedgerChange {
                    product_id: entry.state.id,
                    stock_delta,
                    price,
                })
            })
            .collect()
    }

    /// Iterates over the loaded products, in load order.
    pub fn products(&self) -> impl Iterator<Item = &ProductState> {
        self.entries.iter().map(|entry| &entry.state)
    }
}

fn check_units(units: i64) -> Result<(), InventoryError> {
    if units < 0 {
        return Err(InventoryError::InvalidField {
            field: "cantidad",
            reason: format!("unit count cannot be negative: {units}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(stock: i64) -> ProductState {
        ProductState {
            id: Uuid::new_v4(),
            nombre: "Huevos AA".to_string(),
            stock,
            preciocompra: dec!(80),
            precioventa: dec!(150),
            margenganancia: dec!(0.3),
            estado: true,
        }
    }

    #[test]
    fn test_increase_then_decrease_composes() {
        let p = product(100);
        let id = p.id;
        let mut ledger = ProductLedger::new();
        ledger.load(p);

        ledger.increase_stock(id, 60).unwrap();
        ledger.decrease_stock(id, 150).unwrap();

        assert_eq!(ledger.product(id).unwrap().stock, 10);
        let changes = ledger.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].stock_delta, -90);
        assert_eq!(changes[0].required_stock(), 90);
        assert!(changes[0].price.is_none());
    }

    #[test]
    fn test_decrease_insufficient_leaves_stock() {
        let p = product(5);
        let id = p.id;
        let mut ledger = ProductLedger::new();
        ledger.load(p);

        let result = ledger.decrease_stock(id, 6);
        assert!(matches!(
            result,
            Err(InventoryError::InsufficientStock { requested: 6, available: 5, .. })
        ));
        assert_eq!(ledger.product(id).unwrap().stock, 5);
        assert!(ledger.changes().is_empty());
    }

    #[test]
    fn test_decrease_clamped() {
        let p = product(4);
        let id = p.id;
        let mut ledger = ProductLedger::new();
        ledger.load(p);

        assert_eq!(ledger.decrease_stock_clamped(id, 10).unwrap(), 4);
        assert_eq!(ledger.product(id).unwrap().stock, 0);
        assert_eq!(ledger.decrease_stock_clamped(id, 1).unwrap(), 0);
    }

    #[test]
    fn test_set_cost_and_price() {
        let p = product(0);
        let id = p.id;
        let mut ledger = ProductLedger::new();
        ledger.load(p);

        ledger.set_cost_and_price(id, dec!(83.33), dec!(150)).unwrap();
        let changes = ledger.changes();
        assert_eq!(changes[0].stock_delta, 0);
        assert_eq!(
            changes[0].price,
            Some(PriceUpdate {
                preciocompra: dec!(83.33),
                precioventa: dec!(150),
            })
        );

        let result = ledger.set_cost_and_price(id, dec!(-1), dec!(150));
        assert!(matches!(result, Err(InventoryError::NegativePrice { .. })));
    }

    #[test]
    fn test_unknown_product() {
        let mut ledger = ProductLedger::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            ledger.increase_stock(id, 1),
            Err(InventoryError::ProductNotFound(p)) if p == id
        ));
        assert!(ledger.product(id).is_err());
    }

    #[test]
    fn test_reload_keeps_working_state() {
        let p = product(10);
        let id = p.id;
        let mut ledger = ProductLedger::new();
        ledger.load(p.clone());
        ledger.increase_stock(id, 5).unwrap();
        ledger.load(p);

        assert_eq!(ledger.product(id).unwrap().stock, 15);
        assert_eq!(ledger.products().count(), 1);
    }

    #[test]
    fn test_negative_units_rejected() {
        let p = product(10);
        let id = p.id;
        let mut ledger = ProductLedger::new();
        ledger.load(p);
        assert!(matches!(
            ledger.decrease_stock(id, -1),
            Err(InventoryError::InvalidField { .. })
        ));
    }
}
