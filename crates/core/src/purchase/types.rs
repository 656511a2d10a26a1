//! Purchase domain types.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consolidation::Consolidate;
use crate::error::InventoryError;
use crate::units::COST_DECIMAL_PLACES;

/// Purchase status.
///
/// A purchase is active from creation and can only be voided once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PurchaseStatus {
    /// Registered and counted in stock.
    Active,
    /// Voided; its stock and price effects were reversed.
    Void,
}

impl PurchaseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Void => "VOID",
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw purchase line as received from the request layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseLineInput {
    /// Product ID.
    pub idproducto: Option<Uuid>,
    /// Quantity in presentation units.
    pub cantidad: Option<i32>,
    /// Price paid per presentation unit.
    pub preciodecompra: Option<Decimal>,
    /// Presentation ID.
    pub idpresentacion: Option<Uuid>,
}

/// Raw purchase as received from the request layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePurchaseInput {
    /// Business purchase number.
    pub nrodecompra: Option<i64>,
    /// Purchase date, `YYYY-MM-DD`.
    pub fechadecompra: Option<String>,
    /// Supplier NIT.
    pub nitproveedor: Option<String>,
    /// Purchase lines.
    #[serde(default)]
    pub lines: Vec<PurchaseLineInput>,
}

/// A validated, consolidated purchase line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLine {
    /// Product ID.
    pub producto_id: Uuid,
    /// Presentation ID.
    pub presentacion_id: Uuid,
    /// Quantity in presentation units.
    pub cantidad: i32,
    /// Amount paid for the line.
    pub subtotal: Decimal,
}

impl PurchaseLine {
    /// Price per presentation unit (the subtotal-weighted average after consolidation).
    #[must_use]
    pub fn preciodecompra(&self) -> Decimal {
        if self.cantidad <= 0 {
            return Decimal::ZERO;
        }
        (self.subtotal / Decimal::from(self.cantidad))
            .round_dp_with_strategy(COST_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
    }
}

impl Consolidate for PurchaseLine {
    fn key(&self) -> (Uuid, Uuid) {
        (self.producto_id, self.presentacion_id)
    }

    fn absorb(&mut self, other: Self) -> Result<(), InventoryError> {
        self.cantidad = self
            .cantidad
            .checked_add(other.cantidad)
            .ok_or_else(|| InventoryError::out_of_range("cantidad"))?;
        self.subtotal = self
            .subtotal
            .checked_add(other.subtotal)
            .ok_or_else(|| InventoryError::out_of_range("preciodecompra"))?;
        Ok(())
    }
}

/// A purchase that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPurchase {
    /// Business purchase number.
    pub nrodecompra: i64,
    /// Purchase date.
    pub fechadecompra: NaiveDate,
    /// Supplier NIT, trimmed.
    pub nitproveedor: String,
    /// Consolidated lines.
    pub lines: Vec<PurchaseLine>,
}

impl ValidatedPurchase {
    /// Sum of all consolidated subtotals.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the sum does not fit a `Decimal`.
    pub fn total(&self) -> Result<Decimal, InventoryError> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.subtotal))
            .ok_or_else(|| InventoryError::out_of_range("preciodecompra"))
    }
}

/// Result of applying one consolidated line to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPurchaseLine {
    /// Product ID.
    pub producto_id: Uuid,
    /// Presentation ID.
    pub presentacion_id: Uuid,
    /// Application order within the purchase, starting at 0.
    pub posicion: i32,
    /// Quantity in presentation units.
    pub cantidad: i32,
    /// Factor in force when the line was applied.
    pub factor_conversion: i32,
    /// Price per presentation unit.
    pub preciodecompra: Decimal,
    /// Amount paid for the line.
    pub subtotal: Decimal,
    /// Base units added to stock.
    pub unidades: i64,
    /// Product cost before this line.
    pub preciocompra_anterior: Decimal,
    /// Product sale price before this line.
    pub precioventa_anterior: Decimal,
    /// Product cost after this line.
    pub preciocompra_nuevo: Decimal,
    /// Product sale price after this line.
    pub precioventa_nuevo: Decimal,
}

/// A persisted purchase line, as needed to reverse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPurchaseLine {
    /// Product ID.
    pub producto_id: Uuid,
    /// Application order within the purchase.
    pub posicion: i32,
    /// Quantity in presentation units.
    pub cantidad: i32,
    /// Factor snapshot.
    pub factor_conversion: i32,
    /// Product cost before the line was applied.
    pub preciocompra_anterior: Decimal,
    /// Product sale price before the line was applied.
    pub precioventa_anterior: Decimal,
}
