//! Transaction coordinator.
//!
//! Every purchase and sale operation runs inside one [`UnitOfWork`]: all reads
//! and writes go through [`UnitOfWork::conn`], and the work either commits as a
//! whole or is rolled back as a whole.
//!
//! # Usage
//!
//! ```ignore
//! use tendero_db::UnitOfWork;
//!
//! let uow = UnitOfWork::begin(&db).await.map_err(db_err)?;
//! let result = do_work(uow.conn()).await;
//! let value = uow.finish(result).await?;
//! ```

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tracing::{debug, error};

use tendero_core::InventoryError;

use crate::error::db_err;

/// A database transaction scoping one inventory operation.
///
/// Dropping a unit of work without committing rolls it back.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    /// Begins a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        Ok(Self { txn })
    }

    /// Returns the transaction all queries of the operation must use.
    #[must_use]
    pub fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction, persisting all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }

    /// Commits on `Ok`, rolls back on `Err`, and passes the result through.
    ///
    /// A failed rollback is logged; the original error is still returned.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or `Database` if the commit fails.
    pub async fn finish<T>(self, result: Result<T, InventoryError>) -> Result<T, InventoryError> {
        match result {
            Ok(value) => {
                self.commit().await.map_err(db_err)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    error!(error = %rollback_err, "Rollback failed");
                } else {
                    debug!(error_code = err.error_code(), "Transaction rolled back");
                }
                Err(err)
            }
        }
    }
}
