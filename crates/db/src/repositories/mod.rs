//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod catalog;
pub mod ledger;
pub mod purchase;
pub mod sale;

pub use catalog::{CatalogRepository, CreatePresentationInput, CreateProductInput};
pub use purchase::{PurchaseDetail, PurchaseLineDetail, PurchaseRepository};
pub use sale::{GENERIC_CONSUMER_NAME, SaleDetail, SaleLineDetail, SaleRepository};

use tendero_core::{ErrorKind, InventoryError};
use tracing::warn;

/// Logs a rejected operation. Storage failures are already logged by
/// [`db_err`](crate::db_err).
pub(crate) fn log_failure(operation: &'static str, err: &InventoryError) {
    if err.kind() != ErrorKind::Internal {
        warn!(operation, error_code = err.error_code(), error = %err, "Operation rejected");
    }
}
