//! Sale domain types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consolidation::Consolidate;
use crate::error::InventoryError;

/// Sale status.
///
/// Valid transitions:
/// - PENDIENTE → COMPLETADA (confirm)
/// - PENDIENTE → ANULADA (cancel)
/// - COMPLETADA → ANULADA (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleStatus {
    /// Mobile order awaiting confirmation; stock untouched.
    Pendiente,
    /// Stock has been deducted.
    Completada,
    /// Cancelled.
    Anulada,
}

impl SaleStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::Completada => "COMPLETADA",
            Self::Anulada => "ANULADA",
        }
    }

    /// Returns true if stock was deducted for the sale.
    #[must_use]
    pub const fn holds_stock(self) -> bool {
        matches!(self, Self::Completada)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sale type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleType {
    /// Counter sale; stock leaves at creation.
    VentaDirecta,
    /// Mobile order; stock leaves at confirmation.
    PedidoMovil,
}

impl SaleType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VentaDirecta => "VENTA_DIRECTA",
            Self::PedidoMovil => "PEDIDO_MOVIL",
        }
    }

    /// Status a new sale of this type starts in.
    #[must_use]
    pub const fn initial_status(self) -> SaleStatus {
        match self {
            Self::VentaDirecta => SaleStatus::Completada,
            Self::PedidoMovil => SaleStatus::Pendiente,
        }
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleType {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "VENTA_DIRECTA" => Ok(Self::VentaDirecta),
            "PEDIDO_MOVIL" => Ok(Self::PedidoMovil),
            _ => Err(InventoryError::InvalidType(s.to_string())),
        }
    }
}

/// Raw sale line as received from the request layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleLineInput {
    /// Product ID.
    pub idproducto: Option<Uuid>,
    /// Presentation ID.
    pub idpresentacion: Option<Uuid>,
    /// Quantity in presentation units.
    pub cantidad: Option<i32>,
}

/// Raw sale as received from the request layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSaleInput {
    /// Client document; empty or absent means the generic consumer.
    pub documentocliente: Option<String>,
    /// `VENTA_DIRECTA` or `PEDIDO_MOVIL`.
    pub tipo: Option<String>,
    /// Sale lines.
    #[serde(default)]
    pub lines: Vec<SaleLineInput>,
}

/// Who a sale is billed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRef {
    /// The reserved generic consumer, created on demand.
    Generic(String),
    /// A registered client that must exist and be active.
    Registered(String),
}

impl ClientRef {
    /// The client document.
    #[must_use]
    pub fn document(&self) -> &str {
        match self {
            Self::Generic(doc) | Self::Registered(doc) => doc,
        }
    }
}

/// A validated, consolidated sale line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    /// Product ID.
    pub producto_id: Uuid,
    /// Presentation ID.
    pub presentacion_id: Uuid,
    /// Quantity in presentation units.
    pub cantidad: i32,
}

impl Consolidate for SaleLine {
    fn key(&self) -> (Uuid, Uuid) {
        (self.producto_id, self.presentacion_id)
    }

    fn absorb(&mut self, other: Self) -> Result<(), InventoryError> {
        self.cantidad = self
            .cantidad
            .checked_add(other.cantidad)
            .ok_or_else(|| InventoryError::out_of_range("cantidad"))?;
        Ok(())
    }
}

/// A sale that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSale {
    /// Billed client.
    pub client: ClientRef,
    /// Sale type.
    pub tipo: SaleType,
    /// Consolidated lines.
    pub lines: Vec<SaleLine>,
}

/// A consolidated line priced against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedSaleLine {
    /// Product ID.
    pub producto_id: Uuid,
    /// Presentation ID.
    pub presentacion_id: Uuid,
    /// Quantity in presentation units.
    pub cantidad: i32,
    /// Factor in force when the line was priced.
    pub factor_conversion: i32,
    /// Base units sold.
    pub unidades: i64,
    /// Sale price of one base unit.
    pub precioventa: Decimal,
    /// `unidades × precioventa`.
    pub subtotal: Decimal,
}

/// A persisted sale line, as needed to confirm or reverse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSaleLine {
    /// Product ID.
    pub producto_id: Uuid,
    /// Quantity in presentation units.
    pub cantidad: i32,
    /// Factor snapshot.
    pub factor_conversion: i32,
}

/// Outcome of a valid cancellation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleCancellation {
    /// Status after cancellation (always ANULADA).
    pub new_status: SaleStatus,
    /// Whether the sold units go back to stock.
    pub restore_stock: bool,
    /// Trimmed cancellation reason.
    pub motivo: String,
}
