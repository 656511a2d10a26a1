//! Sale engine logic.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{
    ClientRef, CreateSaleInput, PricedSaleLine, RecordedSaleLine, SaleCancellation, SaleLine,
    SaleStatus, SaleType, ValidatedSale,
};
use crate::consolidation::consolidate;
use crate::error::InventoryError;
use crate::ledger::ProductLedger;
use crate::pricing::round_cop;
use crate::units::to_base_units;

/// Stateless sale logic.
///
/// Validation and state transitions return plain values; stock effects are
/// applied to a [`ProductLedger`] the caller persists.
pub struct SaleService;

impl SaleService {
    /// Validates a raw sale and consolidates its lines.
    ///
    /// # Arguments
    /// * `input` - The raw sale
    /// * `generic_document` - Document of the reserved generic consumer
    ///
    /// # Errors
    ///
    /// Returns `InvalidType`, `EmptyLines`, `MissingField`, or `InvalidField`.
    pub fn validate(
        input: &CreateSaleInput,
        generic_document: &str,
    ) -> Result<ValidatedSale, InventoryError> {
        let tipo: SaleType = input
            .tipo
            .as_deref()
            .ok_or_else(|| InventoryError::InvalidType("(missing)".to_string()))?
            .parse()?;

        let client = Self::resolve_client(input.documentocliente.as_deref(), generic_document);

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
            lines.push(SaleLine {
                producto_id,
                presentacion_id,
                cantidad,
            });
        }

        Ok(ValidatedSale {
            client,
            tipo,
            lines: consolidate(lines)?,
        })
    }

    /// Maps a client document to the client the sale is billed to.
    ///
    /// An absent, blank, or reserved document means the generic consumer.
    #[must_use]
    pub fn resolve_client(document: Option<&str>, generic_document: &str) -> ClientRef {
        match document.map(str::trim) {
            Some(doc) if !doc.is_empty() && doc != generic_document => {
                ClientRef::Registered(doc.to_string())
            }
            _ => ClientRef::Generic(generic_document.to_string()),
        }
    }

    /// Prices one consolidated line and, for direct sales, takes its units out of stock.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `ProductInactive`, or, for direct sales,
    /// `InsufficientStock`.
    pub fn price_line(
        ledger: &mut ProductLedger,
        line: &SaleLine,
        factor_conversion: i32,
        tipo: SaleType,
    ) -> Result<PricedSaleLine, InventoryError> {
        let product = ledger.product(line.producto_id)?;
        if !product.estado {
            return Err(InventoryError::ProductInactive(line.producto_id));
        }
        let precioventa = product.precioventa;

        let unidades = to_base_units(line.cantidad, factor_conversion);
        if tipo == SaleType::VentaDirecta {
            ledger.decrease_stock(line.producto_id, unidades)?;
        }

        let subtotal = Decimal::from(unidades)
            .checked_mul(precioventa)
            .ok_or_else(|| InventoryError::out_of_range("cantidad"))?;

        Ok(PricedSaleLine {
            producto_id: line.producto_id,
            presentacion_id: line.presentacion_id,
            cantidad: line.cantidad,
            factor_conversion,
            unidades,
            precioventa,
            subtotal,
        })
    }

    /// Sale total: the sum of line subtotals, rounded up to the nearest 50.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the total does not fit a `Decimal`.
    pub fn total(lines: &[PricedSaleLine]) -> Result<Decimal, InventoryError> {
        lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.subtotal))
            .and_then(round_cop)
            .ok_or_else(|| InventoryError::out_of_range("cantidad"))
    }

    /// Validates the PENDIENTE → COMPLETADA transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the sale is not pending.
    pub fn confirm(current_status: SaleStatus) -> Result<SaleStatus, InventoryError> {
        match current_status {
            SaleStatus::Pendiente => Ok(SaleStatus::Completada),
            _ => Err(InventoryError::InvalidState {
                from: current_status,
                to: SaleStatus::Completada,
            }),
        }
    }

    /// Takes a confirmed order's units out of stock.
    ///
    /// Sufficiency is checked per product over all of its lines before anything
    /// is deducted.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` with the aggregated request, or
    /// `ProductNotFound` if a product was not loaded.
    pub fn apply_confirmation(
        ledger: &mut ProductLedger,
        lines: &[RecordedSaleLine],
    ) -> Result<(), InventoryError> {
        let demand = units_per_product(lines);

        for &(product_id, requested) in &demand {
            let available = ledger.product(product_id)?.stock;
            if available < requested {
                return Err(InventoryError::InsufficientStock {
                    product_id,
                    requested,
                    available,
                });
            }
        }
        for (product_id, units) in demand {
            ledger.decrease_stock(product_id, units)?;
        }
        Ok(())
    }

    /// Validates a cancellation request.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyVoid` for a cancelled sale, or `MotiveRequired` if the
    /// reason is absent or blank.
    pub fn cancel(
        sale_id: Uuid,
        current_status: SaleStatus,
        motivo: Option<&str>,
    ) -> Result<SaleCancellation, InventoryError> {
        if current_status == SaleStatus::Anulada {
            return Err(InventoryError::AlreadyVoid(sale_id));
        }
        let motivo = motivo
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(InventoryError::MotiveRequired)?;

        Ok(SaleCancellation {
            new_status: SaleStatus::Anulada,
            restore_stock: current_status.holds_stock(),
            motivo: motivo.to_string(),
        })
    }

    /// Returns a cancelled sale's units to stock.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if a product was not loaded.
    pub fn apply_cancellation(
        ledger: &mut ProductLedger,
        lines: &[RecordedSaleLine],
    ) -> Result<(), InventoryError> {
        for line in lines {
            ledger.increase_stock(
                line.producto_id,
                to_base_units(line.cantidad, line.factor_conversion),
            )?;
        }
        Ok(())
    }
}

fn units_per_product(lines: &[RecordedSaleLine]) -> Vec<(Uuid, i64)> {
    let mut totals: Vec<(Uuid, i64)> = Vec::new();
    for line in lines {
        let units = to_base_units(line.cantidad, line.factor_conversion);
        match totals.iter_mut().find(|(id, _)| *id == line.producto_id) {
            Some((_, total)) => *total = total.saturating_add(units),
            None => totals.push((line.producto_id, units)),
        }
    }
    totals
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
