//! Post-commit notification seam.
//!
//! Engines call a `Notifier` only after their transaction has committed.
//! A failing notifier never affects the business operation: callers log the
//! error and move on.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Notification delivery errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The receipt could not be rendered or addressed.
    #[error("Failed to build notification: {0}")]
    Build(String),
    /// The transport refused or failed to deliver.
    #[error("Failed to deliver notification: {0}")]
    Delivery(String),
}

/// A committed line, projected with the product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    /// Product name.
    pub producto: String,
    /// Quantity in presentation units.
    pub cantidad: i32,
    /// Base units per presentation unit.
    pub factor_conversion: i32,
    /// Unit price of the line (per presentation unit for purchases, per base unit for sales).
    pub precio: Decimal,
    /// Line subtotal.
    pub subtotal: Decimal,
}

/// Projection of a committed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseReceipt {
    /// Purchase ID.
    pub id: Uuid,
    /// Business purchase number.
    pub nrodecompra: i64,
    /// Purchase date.
    pub fechadecompra: NaiveDate,
    /// Supplier NIT.
    pub nitproveedor: String,
    /// Supplier name.
    pub proveedor: String,
    /// Purchase total.
    pub total: Decimal,
    /// Consolidated lines.
    pub lines: Vec<ReceiptLine>,
}

/// Projection of a committed sale or mobile order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleReceipt {
    /// Sale ID.
    pub id: Uuid,
    /// Client document.
    pub documentocliente: String,
    /// Client name.
    pub cliente: String,
    /// Client email, when known.
    pub email_cliente: Option<String>,
    /// Sale type label (`VENTA_DIRECTA` / `PEDIDO_MOVIL`).
    pub tipo: String,
    /// Sale status label.
    pub estado: String,
    /// Sale total.
    pub total: Decimal,
    /// Consolidated lines.
    pub lines: Vec<ReceiptLine>,
}

/// Collaborator invoked after a purchase or sale commits.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A purchase was registered.
    async fn purchase_registered(&self, receipt: &PurchaseReceipt) -> Result<(), NotifyError>;

    /// A sale or mobile order was registered.
    async fn sale_registered(&self, receipt: &SaleReceipt) -> Result<(), NotifyError>;
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn purchase_registered(&self, _receipt: &PurchaseReceipt) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn sale_registered(&self, _receipt: &SaleReceipt) -> Result<(), NotifyError> {
        Ok(())
    }
}
