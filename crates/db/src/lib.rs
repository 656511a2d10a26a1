//! Database layer with `SeaORM` entities, migrations, and the inventory engines.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The initial migration
//! - The transaction coordinator ([`UnitOfWork`])
//! - Repositories: catalog glue, ledger persistence, and the purchase and sale engines

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod unit_of_work;

pub use error::db_err;
pub use repositories::{
    CatalogRepository, CreatePresentationInput, CreateProductInput, GENERIC_CONSUMER_NAME,
    PurchaseDetail, PurchaseLineDetail, PurchaseRepository, SaleDetail, SaleLineDetail,
    SaleRepository,
};
pub use unit_of_work::UnitOfWork;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
