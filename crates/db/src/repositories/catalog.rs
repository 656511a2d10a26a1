//! Catalog repository.
//!
//! Minimal catalog operations needed to drive the inventory engines: categories,
//! products, presentations, suppliers, and clients. Product prices always follow
//! `precioventa = round_cop(preciocompra * (1 + margenganancia))`.

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use tendero_core::InventoryError;
use tendero_core::pricing::{compute_sale_price, normalize_margin};

use crate::entities::{categorias, clientes, presentaciones, productos, proveedores};
use crate::error::db_err;
use crate::unit_of_work::UnitOfWork;

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Optional category.
    pub categoria_id: Option<Uuid>,
    /// Product name.
    pub nombre: String,
    /// Opening stock in base units.
    #[serde(default)]
    pub stock: i64,
    /// Opening cost of one base unit.
    pub preciocompra: Decimal,
    /// Margin as entered ("30%", "30,5", "0.3").
    pub margenganancia: String,
}

/// Input for creating a presentation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePresentationInput {
    /// Product the presentation belongs to.
    pub producto_id: Uuid,
    /// Presentation name ("Unidad", "Docena").
    pub nombre: String,
    /// Base units per presentation unit.
    pub factor_conversion: i32,
    /// Whether this is the product's default presentation.
    #[serde(default)]
    pub es_predeterminada: bool,
    /// Optional barcode.
    pub codigo_barras: Option<String>,
}

/// Catalog repository.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name, or `Database`.
    pub async fn create_category(&self, nombre: &str) -> Result<categorias::Model, InventoryError> {
        let nombre = required("nombre", nombre)?;
        categorias::ActiveModel {
            id: Set(Uuid::new_v4()),
            nombre: Set(nombre),
            estado: Set(true),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    /// Creates a product, deriving its sale price from cost and margin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMargin`, `InvalidField` for negative stock or cost,
    /// `MissingField` for a blank name, or `Database`.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<productos::Model, InventoryError> {
        let nombre = required("nombre", &input.nombre)?;
        if input.stock < 0 {
            return Err(InventoryError::InvalidField {
                field: "stock",
                reason: format!("cannot be negative, got {}", input.stock),
            });
        }
        let margin = normalize_margin(&input.margenganancia)?;
        let precioventa = compute_sale_price(input.preciocompra, margin)?;

        let product = productos::ActiveModel {
            id: Set(Uuid::new_v4()),
            categoria_id: Set(input.categoria_id),
            nombre: Set(nombre),
            stock: Set(input.stock),
            preciocompra: Set(input.preciocompra),
            precioventa: Set(precioventa),
            margenganancia: Set(margin),
            estado: Set(true),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(product_id = %product.id, margin = %margin, precioventa = %precioventa, "Product created");
        Ok(product)
    }

    /// Changes a product's margin and re-derives its sale price from the current cost.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `InvalidMargin`, or `Database`.
    pub async fn update_product_margin(
        &self,
        product_id: Uuid,
        raw_margin: &str,
    ) -> Result<productos::Model, InventoryError> {
        let margin = normalize_margin(raw_margin)?;

        let uow = UnitOfWork::begin(&self.db).await.map_err(db_err)?;
        let result = async {
            let product = productos::Entity::find_by_id(product_id)
                .lock_exclusive()
                .one(uow.conn())
                .await
                .map_err(db_err)?
                .ok_or(InventoryError::ProductNotFound(product_id))?;

            let precioventa = compute_sale_price(product.preciocompra, margin)?;
            let mut active: productos::ActiveModel = product.into();
            active.margenganancia = Set(margin);
            active.precioventa = Set(precioventa);
            active.update(uow.conn()).await.map_err(db_err)
        }
        .await;
        uow.finish(result).await
    }

    /// Activates or deactivates a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or `Database`.
    pub async fn set_product_status(
        &self,
        product_id: Uuid,
        estado: bool,
    ) -> Result<productos::Model, InventoryError> {
        let product = self.find_product(product_id).await?;
        let mut active: productos::ActiveModel = product.into();
        active.estado = Set(estado);
        active.update(&self.db).await.map_err(db_err)
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or `Database`.
    pub async fn find_product(&self, product_id: Uuid) -> Result<productos::Model, InventoryError> {
        productos::Entity::find_by_id(product_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(InventoryError::ProductNotFound(product_id))
    }

    /// Creates a presentation for an existing product.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `InvalidField` for a non-positive factor, or `Database`.
    pub async fn create_presentation(
        &self,
        input: CreatePresentationInput,
    ) -> Result<presentaciones::Model, InventoryError> {
        let nombre = required("nombre", &input.nombre)?;
        if input.factor_conversion <= 0 {
            return Err(InventoryError::InvalidField {
                field: "factor_conversion",
                reason: format!("must be a positive integer, got {}", input.factor_conversion),
            });
        }
        self.find_product(input.producto_id).await?;

        presentaciones::ActiveModel {
            id: Set(Uuid::new_v4()),
            producto_id: Set(input.producto_id),
            nombre: Set(nombre),
            factor_conversion: Set(input.factor_conversion),
            es_predeterminada: Set(input.es_predeterminada),
            codigo_barras: Set(input.codigo_barras),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    /// Creates an active supplier.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` or `Database`.
    pub async fn create_supplier(
        &self,
        nit: &str,
        nombre: &str,
        email: Option<String>,
    ) -> Result<proveedores::Model, InventoryError> {
        proveedores::ActiveModel {
            nit: Set(required("nit", nit)?),
            nombre: Set(required("nombre", nombre)?),
            email: Set(email),
            estado: Set(true),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    /// Activates or deactivates a supplier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSupplier` if the supplier does not exist, or `Database`.
    pub async fn set_supplier_status(
        &self,
        nit: &str,
        estado: bool,
    ) -> Result<proveedores::Model, InventoryError> {
        let supplier = proveedores::Entity::find_by_id(nit.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| InventoryError::InvalidSupplier(nit.to_string()))?;
        let mut active: proveedores::ActiveModel = supplier.into();
        active.estado = Set(estado);
        active.update(&self.db).await.map_err(db_err)
    }

    /// Creates an active client.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` or `Database`.
    pub async fn create_client(
        &self,
        documento: &str,
        nombre: &str,
        email: Option<String>,
    ) -> Result<clientes::Model, InventoryError> {
        clientes::ActiveModel {
            documento: Set(required("documento", documento)?),
            nombre: Set(required("nombre", nombre)?),
            email: Set(email),
            estado: Set(true),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    /// Activates or deactivates a client.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` or `Database`.
    pub async fn set_client_status(
        &self,
        documento: &str,
        estado: bool,
    ) -> Result<clientes::Model, InventoryError> {
        let client = clientes::Entity::find_by_id(documento.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| InventoryError::ClientNotFound(documento.to_string()))?;
        let mut active: clientes::ActiveModel = client.into();
        active.estado = Set(estado);
        active.update(&self.db).await.map_err(db_err)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, InventoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
