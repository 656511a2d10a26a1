//! Shared fixtures for the repository integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema.
//! The pool holds a single connection so the in-memory database lives as long
//! as the pool does.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use tendero_core::purchase::{CreatePurchaseInput, PURCHASE_DATE_FORMAT, PurchaseLineInput};
use tendero_core::sale::{CreateSaleInput, SaleLineInput};
use tendero_db::entities::productos;
use tendero_db::migration::Migrator;
use tendero_db::{CatalogRepository, CreatePresentationInput, CreateProductInput};
use tendero_shared::{
    InventoryConfig, Notifier, NotifyError, PurchaseReceipt, SaleReceipt,
};

pub const SUPPLIER_NIT: &str = "900123456";
pub const CLIENT_DOC: &str = "1020304050";

/// Opens a fresh, migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// A product with a unit and a dozen presentation.
#[derive(Debug, Clone, Copy)]
pub struct ProductFixture {
    pub id: Uuid,
    pub unidad: Uuid,
    pub docena: Uuid,
}

/// Creates a product with the given opening stock, cost, and margin, plus its
/// "Unidad" (×1) and "Docena" (×12) presentations.
pub async fn create_product(
    db: &DatabaseConnection,
    nombre: &str,
    stock: i64,
    preciocompra: Decimal,
    margin: &str,
) -> ProductFixture {
    let catalog = CatalogRepository::new(db.clone());
    let product = catalog
        .create_product(CreateProductInput {
            categoria_id: None,
            nombre: nombre.to_string(),
            stock,
            preciocompra,
            margenganancia: margin.to_string(),
        })
        .await
        .expect("Failed to create product");

    let unidad = catalog
        .create_presentation(CreatePresentationInput {
            producto_id: product.id,
            nombre: "Unidad".to_string(),
            factor_conversion: 1,
            es_predeterminada: true,
            codigo_barras: None,
        })
        .await
        .expect("Failed to create unit presentation");

    let docena = catalog
        .create_presentation(CreatePresentationInput {
            producto_id: product.id,
            nombre: "Docena".to_string(),
            factor_conversion: 12,
            es_predeterminada: false,
            codigo_barras: None,
        })
        .await
        .expect("Failed to create dozen presentation");

    ProductFixture {
        id: product.id,
        unidad: unidad.id,
        docena: docena.id,
    }
}

/// Creates the default active supplier.
pub async fn create_supplier(db: &DatabaseConnection) {
    CatalogRepository::new(db.clone())
        .create_supplier(SUPPLIER_NIT, "Distribuidora La Esquina", None)
        .await
        .expect("Failed to create supplier");
}

/// Creates the default active client.
pub async fn create_client(db: &DatabaseConnection) {
    CatalogRepository::new(db.clone())
        .create_client(CLIENT_DOC, "Ana Gómez", Some("ana@example.com".to_string()))
        .await
        .expect("Failed to create client");
}

/// Reads a product row.
pub async fn product(db: &DatabaseConnection, id: Uuid) -> productos::Model {
    productos::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to query product")
        .expect("Product not found")
}

/// Formats a date `days_ago` days before today.
pub fn date_days_ago(days_ago: i64) -> String {
    (Utc::now().date_naive() - Duration::days(days_ago))
        .format(PURCHASE_DATE_FORMAT)
        .to_string()
}

/// A purchase input from the default supplier dated today.
pub fn purchase_input(
    nrodecompra: i64,
    lines: &[(Uuid, Uuid, i32, Decimal)],
) -> CreatePurchaseInput {
    CreatePurchaseInput {
        nrodecompra: Some(nrodecompra),
        fechadecompra: Some(date_days_ago(0)),
        nitproveedor: Some(SUPPLIER_NIT.to_string()),
        lines: lines
            .iter()
            .map(|&(product, presentation, cantidad, precio)| PurchaseLineInput {
                idproducto: Some(product),
                cantidad: Some(cantidad),
                preciodecompra: Some(precio),
                idpresentacion: Some(presentation),
            })
            .collect(),
    }
}

/// A sale input of the given type.
pub fn sale_input(
    documento: Option<&str>,
    tipo: &str,
    lines: &[(Uuid, Uuid, i32)],
) -> CreateSaleInput {
    CreateSaleInput {
        documentocliente: documento.map(str::to_string),
        tipo: Some(tipo.to_string()),
        lines: lines
            .iter()
            .map(|&(product, presentation, cantidad)| SaleLineInput {
                idproducto: Some(product),
                idpresentacion: Some(presentation),
                cantidad: Some(cantidad),
            })
            .collect(),
    }
}

pub fn inventory_config() -> InventoryConfig {
    InventoryConfig::default()
}

/// Notifier that records every receipt it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub purchases: Mutex<Vec<PurchaseReceipt>>,
    pub sales: Mutex<Vec<SaleReceipt>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn purchase_registered(&self, receipt: &PurchaseReceipt) -> Result<(), NotifyError> {
        self.purchases.lock().unwrap().push(receipt.clone());
        Ok(())
    }

    async fn sale_registered(&self, receipt: &SaleReceipt) -> Result<(), NotifyError> {
        self.sales.lock().unwrap().push(receipt.clone());
        Ok(())
    }
}

/// Notifier whose transport is always down.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn purchase_registered(&self, _receipt: &PurchaseReceipt) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp relay unreachable".to_string()))
    }

    async fn sale_registered(&self, _receipt: &SaleReceipt) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp relay unreachable".to_string()))
    }
}

pub fn recording() -> Arc<RecordingNotifier> {
    Arc::new(RecordingNotifier::default())
}
