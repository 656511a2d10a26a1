//! Purchase engine logic.
//!
//! Pure counterpart of the purchase repository: validates input, applies
//! consolidated lines to a [`ProductLedger`], and plans cancellations. The
//! repository supplies loaded rows and persists the resulting ledger changes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{
    AppliedPurchaseLine, CreatePurchaseInput, PurchaseLine, PurchaseStatus, RecordedPurchaseLine,
    ValidatedPurchase,
};
use crate::consolidation::consolidate;
use crate::error::InventoryError;
use crate::ledger::ProductLedger;
use crate::pricing::compute_sale_price;
use crate::units::{to_base_units, unit_cost};

/// Date format accepted for `fechadecompra`.
pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stateless purchase logic.
pub struct PurchaseService;

impl PurchaseService {
    /// Validates a raw purchase and consolidates its lines.
    ///
    /// Checks, in order: purchase number, date, supplier, non-empty lines, then
    /// every line's fields.
    ///
    /// # Errors
    ///
    /// Returns `MissingField`, `InvalidField`, or `EmptyLines`.
    pub fn validate(input: &CreatePurchaseInput) -> Result<ValidatedPurchase, InventoryError> {
        let nrodecompra = input
            .nrodecompra
            .ok_or(InventoryError::MissingField("nrodecompra"))?;
        if nrodecompra <= 0 {
            return Err(InventoryError::InvalidField {
                field: "nrodecompra",
                reason: format!("must be a positive integer, got {nrodecompra}"),
            });
        }

        let raw_date = input
            .fechadecompra
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(InventoryError::MissingField("fechadecompra"))?;
        let fechadecompra = NaiveDate::parse_from_str(raw_date, PURCHASE_DATE_FORMAT).map_err(
            |_| InventoryError::InvalidField {
                field: "fechadecompra",
                reason: format!("expected YYYY-MM-DD, got {raw_date:?}"),
            },
        )?;

        let nitproveedor = input
            .nitproveedor
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(InventoryError::MissingField("nitproveedor"))?
            .to_string();

        if input.lines.is_empty() {
            return Err(InventoryError::EmptyLines);
        }

        let mut lines = Vec::with_capacity(input.lines.len());
        for (index, line) in input.lines.iter().enumerate() {
            let producto_id = line
                .idproducto
                .ok_or(InventoryError::MissingField("idproducto"))?;
            let presentacion_id = line
                .idpresentacion
                .ok_or(InventoryError::MissingField("idpresentacion"))?;
            let cantidad = line.cantidad.ok_or(InventoryError::MissingField("cantidad"))?;
            if cantidad <= 0 {
                return Err(InventoryError::InvalidField {
                    field: "cantidad",
                    reason: format!("line {}: must be greater than zero, got {cantidad}", index + 1),
                });
            }
            let precio = line
                .preciodecompra
                .ok_or(InventoryError::MissingField("preciodecompra"))?;
            if precio <= Decimal::ZERO {
                return Err(InventoryError::InvalidField {
                    field: "preciodecompra",
                    reason: format!("line {}: must be greater than zero, got {precio}", index + 1),
                });
            }

            let subtotal = Decimal::from(cantidad)
                .checked_mul(precio)
                .ok_or_else(|| InventoryError::out_of_range("preciodecompra"))?;

            lines.push(PurchaseLine {
                producto_id,
                presentacion_id,
                cantidad,
                subtotal,
            });
        }

        let validated = ValidatedPurchase {
            nrodecompra,
            fechadecompra,
            nitproveedor,
            lines: consolidate(lines)?,
        };
        validated.total()?;
        Ok(validated)
    }

    /// Applies one consolidated line to the ledger.
    ///
    /// Adds the line's base units to stock, sets the product cost to the line's
    /// per-base-unit cost, and recomputes the sale price from the product margin.
    /// The prices in force before the line are returned as snapshots.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product was not loaded, `NegativeMargin`
    /// if the product margin is negative, or `NegativePrice`.
    pub fn apply_line(
        ledger: &mut ProductLedger,
        line: &PurchaseLine,
        factor_conversion: i32,
        posicion: i32,
    ) -> Result<AppliedPurchaseLine, InventoryError> {
        let product = ledger.product(line.producto_id)?;
        if product.margenganancia < Decimal::ZERO {
            return Err(InventoryError::NegativeMargin(line.producto_id));
        }
        let preciocompra_anterior = product.preciocompra;
        let precioventa_anterior = product.precioventa;
        let margin = product.margenganancia;

        let unidades = to_base_units(line.cantidad, factor_conversion);
        let preciocompra_nuevo = unit_cost(line.subtotal, line.cantidad, factor_conversion);
        let precioventa_nuevo = compute_sale_price(preciocompra_nuevo, margin)?;

        ledger.increase_stock(line.producto_id, unidades)?;
        ledger.set_cost_and_price(line.producto_id, preciocompra_nuevo, precioventa_nuevo)?;

        Ok(AppliedPurchaseLine {
            producto_id: line.producto_id,
            presentacion_id: line.presentacion_id,
            posicion,
            cantidad: line.cantidad,
            factor_conversion,
            preciodecompra: line.preciodecompra(),
            subtotal: line.subtotal,
            unidades,
            preciocompra_anterior,
            precioventa_anterior,
            preciocompra_nuevo,
            precioventa_nuevo,
        })
    }

    /// Checks whether a purchase may be voided on `today`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyVoid` for a void purchase, or `TooOld` if the purchase is
    /// more than `window_days` days old.
    pub fn check_cancellable(
        purchase_id: Uuid,
        status: PurchaseStatus,
        fechadecompra: NaiveDate,
        today: NaiveDate,
        window_days: i64,
    ) -> Result<(), InventoryError> {
        if status == PurchaseStatus::Void {
            return Err(InventoryError::AlreadyVoid(purchase_id));
        }
        let age_days = (today - fechadecompra).num_days();
        if age_days > window_days {
            return Err(InventoryError::TooOld {
                age_days,
                max_days: window_days,
            });
        }
        Ok(())
    }

    /// Reverses a purchase's lines on the ledger.
    ///
    /// Every product must still hold the base units the purchase contributed,
    /// summed over all of its lines; otherwise nothing is applied. Lines are then
    /// undone in reverse application order: stock is decreased (clamped at zero)
    /// and prices are restored from the line snapshots.
    ///
    /// # Errors
    ///
    /// Returns `StockAlreadyConsumed` if any product no longer holds its
    /// contributed units, or `ProductNotFound` if a product was not loaded.
    pub fn apply_cancellation(
        ledger: &mut ProductLedger,
        lines: &[RecordedPurchaseLine],
    ) -> Result<(), InventoryError> {
        let mut contributed: Vec<(Uuid, i64)> = Vec::new();
        for line in lines {
            let units = to_base_units(line.cantidad, line.factor_conversion);
            match contributed.iter_mut().find(|(id, _)| *id == line.producto_id) {
                Some((_, total)) => *total = total.saturating_add(units),
                None => contributed.push((line.producto_id, units)),
            }
        }

        for &(product_id, required) in &contributed {
            let available = ledger.product(product_id)?.stock;
            if available < required {
                return Err(InventoryError::StockAlreadyConsumed {
                    product_id,
                    required,
                    available,
                });
            }
        }

        let mut ordered: Vec<&RecordedPurchaseLine> = lines.iter().collect();
        ordered.sort_by_key(|line| std::cmp::Reverse(line.posicion));
        for line in ordered {
            let units = to_base_units(line.cantidad, line.factor_conversion);
            ledger.decrease_stock_clamped(line.producto_id, units)?;
            ledger.set_cost_and_price(
                line.producto_id,
                line.preciocompra_anterior,
                line.precioventa_anterior,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
