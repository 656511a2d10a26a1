//! Storage error mapping.

use sea_orm::{DbErr, SqlErr};
use tracing::error;

use tendero_core::InventoryError;

/// Logs a storage error and converts it into `InventoryError::Database`.
pub fn db_err(err: DbErr) -> InventoryError {
    error!(error = %err, "Database operation failed");
    InventoryError::Database(err.to_string())
}

/// Returns true if the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
