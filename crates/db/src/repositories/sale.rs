//! Sale repository: the sale transaction engine.
//!
//! Direct sales and mobile orders share one path; the difference is whether
//! stock leaves at creation or at confirmation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, sea_query::OnConflict,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use tendero_core::InventoryError;
use tendero_core::sale::{
    ClientRef, CreateSaleInput, RecordedSaleLine, SaleService, SaleStatus as EngineSaleStatus,
    SaleType as EngineSaleType, ValidatedSale,
};
use tendero_shared::{InventoryConfig, Notifier, ReceiptLine, SaleReceipt};

use super::ledger::{distinct, factor_for, load_presentations, load_products, persist_changes};
use super::log_failure;
use crate::entities::{
    clientes, detalle_ventas, productos, sea_orm_active_enums::SaleStatus, ventas,
};
use crate::error::db_err;
use crate::unit_of_work::UnitOfWork;

/// Name given to the generic consumer when it is created on demand.
pub const GENERIC_CONSUMER_NAME: &str = "Consumidor final";

/// A sale line with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleLineDetail {
    /// Stored line.
    #[serde(flatten)]
    pub line: detalle_ventas::Model,
    /// Product name.
    pub producto: String,
}

/// A sale with its client and lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleDetail {
    /// Stored sale header.
    #[serde(flatten)]
    pub sale: ventas::Model,
    /// Client name.
    pub cliente: String,
    /// Client email, used only for the receipt.
    #[serde(skip)]
    pub email_cliente: Option<String>,
    /// Lines in the order they were entered, after consolidation.
    pub lines: Vec<SaleLineDetail>,
}

impl SaleDetail {
    /// Projection handed to the notifier.
    #[must_use]
    pub fn receipt(&self) -> SaleReceipt {
        SaleReceipt {
            id: self.sale.id,
            documentocliente: self.sale.documentocliente.clone(),
            cliente: self.cliente.clone(),
            email_cliente: self.email_cliente.clone(),
            tipo: EngineSaleType::from(self.sale.tipo).as_str().to_string(),
            estado: EngineSaleStatus::from(self.sale.estado).as_str().to_string(),
            total: self.sale.total,
            lines: self
                .lines
                .iter()
                .map(|detail| ReceiptLine {
                    producto: detail.producto.clone(),
                    cantidad: detail.line.cantidad,
                    factor_conversion: detail.line.factor_conversion,
                    precio: detail.line.precioventa,
                    subtotal: detail.line.subtotal,
                })
                .collect(),
        }
    }
}

/// Sale repository.
#[derive(Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
    generic_consumer_document: String,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn Notifier>, config: &InventoryConfig) -> Self {
        Self {
            db,
            notifier,
            generic_consumer_document: config.generic_consumer_document.clone(),
        }
    }

    /// Registers a direct sale or a mobile order.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ClientNotFound`, `ClientInactive`,
    /// `ProductNotFound`, `ProductInactive`, `PresentationNotFound`,
    /// `InvalidPresentation`, `InsufficientStock` (direct sales), or `Database`.
    pub async fn create_sale(&self, input: CreateSaleInput) -> Result<SaleDetail, InventoryError> {
        let validated = SaleService::validate(&input, &self.generic_consumer_document)
            .inspect_err(|e| log_failure("create_sale", e))?;

        let uow = UnitOfWork::begin(&self.db).await.map_err(db_err)?;
        let result = Self::insert_sale(uow.conn(), &validated).await;
        let detail = uow
            .finish(result)
            .await
            .inspect_err(|e| log_failure("create_sale", e))?;

        info!(
            sale_id = %detail.sale.id,
            tipo = %EngineSaleType::from(detail.sale.tipo),
            total = %detail.sale.total,
            lines = detail.lines.len(),
            "Sale registered"
        );

        if let Err(err) = self.notifier.sale_registered(&detail.receipt()).await {
            warn!(sale_id = %detail.sale.id, error = %err, "Sale notification failed");
        }

        Ok(detail)
    }

    async fn insert_sale(
        txn: &DatabaseTransaction,
        validated: &ValidatedSale,
    ) -> Result<SaleDetail, InventoryError> {
        let client = resolve_client(txn, &validated.client).await?;

        let product_ids = distinct(validated.lines.iter().map(|l| l.producto_id));
        let presentation_ids = distinct(validated.lines.iter().map(|l| l.presentacion_id));
        let mut ledger = load_products(txn, &product_ids).await?;
        let presentations = load_presentations(txn, &presentation_ids).await?;

        let mut priced = Vec::with_capacity(validated.lines.len());
        for line in &validated.lines {
            let factor = factor_for(&presentations, line.producto_id, line.presentacion_id)?;
            priced.push(SaleService::price_line(
                &mut ledger,
                line,
                factor,
                validated.tipo,
            )?);
        }
        let total = SaleService::total(&priced)?;

        persist_changes(txn, &ledger.changes()).await?;

        let sale = ventas::ActiveModel {
            id: Set(Uuid::new_v4()),
            documentocliente: Set(client.documento.clone()),
            fechaventa: Set(Utc::now().fixed_offset()),
            total: Set(total),
            estado: Set(validated.tipo.initial_status().into()),
            tipo: Set(validated.tipo.into()),
            motivo_anulacion: Set(None),
        }
        .insert(txn)
        .await
        .map_err(db_err)?;

        let mut lines = Vec::with_capacity(priced.len());
        for (index, line) in priced.into_iter().enumerate() {
            let posicion = i32::try_from(index)
                .map_err(|_| InventoryError::Internal("too many sale lines".to_string()))?;
            let stored = detalle_ventas::ActiveModel {
                id: Set(Uuid::new_v4()),
                venta_id: Set(sale.id),
                producto_id: Set(line.producto_id),
                presentacion_id: Set(line.presentacion_id),
                posicion: Set(posicion),
                cantidad: Set(line.cantidad),
                factor_conversion: Set(line.factor_conversion),
                precioventa: Set(line.precioventa),
                subtotal: Set(line.subtotal),
            }
            .insert(txn)
            .await
            .map_err(db_err)?;

            let producto = ledger.product(line.producto_id)?.nombre.clone();
            lines.push(SaleLineDetail {
                line: stored,
                producto,
            });
        }

        Ok(SaleDetail {
            sale,
            cliente: client.nombre,
            email_cliente: client.email,
            lines,
        })
    }

    /// Confirms a pending mobile order, taking its units out of stock.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound`, `InvalidState`, `InsufficientStock`, or `Database`.
    pub async fn confirm_sale(&self, sale_id: Uuid) -> Result<SaleDetail, InventoryError> {
        let uow = UnitOfWork::begin(&self.db).await.map_err(db_err)?;
        let result = Self::complete_order(uow.conn(), sale_id).await;
        let detail = uow
            .finish(result)
            .await
            .inspect_err(|e| log_failure("confirm_sale", e))?;

        info!(sale_id = %sale_id, total = %detail.sale.total, "Mobile order confirmed");
        Ok(detail)
    }

    async fn complete_order(
        txn: &DatabaseTransaction,
        sale_id: Uuid,
    ) -> Result<SaleDetail, InventoryError> {
        let sale = lock_sale(txn, sale_id).await?;
        let new_status = SaleService::confirm(sale.estado.into())?;

        let recorded = recorded_lines(txn, sale_id).await?;
        let product_ids = distinct(recorded.iter().map(|l| l.producto_id));
        let mut ledger = load_products(txn, &product_ids).await?;
        SaleService::apply_confirmation(&mut ledger, &recorded)?;
        persist_changes(txn, &ledger.changes()).await?;

        let mut active: ventas::ActiveModel = sale.into();
        active.estado = Set(SaleStatus::from(new_status));
        active.update(txn).await.map_err(db_err)?;

        load_detail(txn, sale_id).await
    }

    /// Cancels a sale or mobile order.
    ///
    /// Completed sales give their units back to stock; pending orders never
    /// took any.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound`, `AlreadyVoid`, `MotiveRequired`, or `Database`.
    pub async fn cancel_sale(
        &self,
        sale_id: Uuid,
        motivo: Option<String>,
    ) -> Result<SaleDetail, InventoryError> {
        let uow = UnitOfWork::begin(&self.db).await.map_err(db_err)?;
        let result = Self::void_sale(uow.conn(), sale_id, motivo.as_deref()).await;
        let detail = uow
            .finish(result)
            .await
            .inspect_err(|e| log_failure("cancel_sale", e))?;

        info!(sale_id = %sale_id, "Sale cancelled");
        Ok(detail)
    }

    async fn void_sale(
        txn: &DatabaseTransaction,
        sale_id: Uuid,
        motivo: Option<&str>,
    ) -> Result<SaleDetail, InventoryError> {
        let sale = lock_sale(txn, sale_id).await?;
        let cancellation = SaleService::cancel(sale_id, sale.estado.into(), motivo)?;

        if cancellation.restore_stock {
            let recorded = recorded_lines(txn, sale_id).await?;
            let product_ids = distinct(recorded.iter().map(|l| l.producto_id));
            let mut ledger = load_products(txn, &product_ids).await?;
            SaleService::apply_cancellation(&mut ledger, &recorded)?;
            persist_changes(txn, &ledger.changes()).await?;
        }

        let mut active: ventas::ActiveModel = sale.into();
        active.estado = Set(SaleStatus::from(cancellation.new_status));
        active.motivo_anulacion = Set(Some(cancellation.motivo));
        active.update(txn).await.map_err(db_err)?;

        load_detail(txn, sale_id).await
    }

    /// Reads a sale with its lines.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound` or `Database`.
    pub async fn get_sale(&self, sale_id: Uuid) -> Result<SaleDetail, InventoryError> {
        load_detail(&self.db, sale_id).await
    }
}

/// Finds the billed client, creating the generic consumer inside the sale's
/// transaction if it does not exist yet.
async fn resolve_client(
    txn: &DatabaseTransaction,
    client: &ClientRef,
) -> Result<clientes::Model, InventoryError> {
    match client {
        ClientRef::Generic(document) => {
            clientes::Entity::insert(clientes::ActiveModel {
                documento: Set(document.clone()),
                nombre: Set(GENERIC_CONSUMER_NAME.to_string()),
                email: Set(None),
                estado: Set(true),
            })
            .on_conflict(
                OnConflict::column(clientes::Column::Documento)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await
            .map_err(db_err)?;

            clientes::Entity::find_by_id(document.clone())
                .one(txn)
                .await
                .map_err(db_err)?
                .ok_or_else(|| InventoryError::ClientNotFound(document.clone()))
        }
        ClientRef::Registered(document) => {
            let found = clientes::Entity::find_by_id(document.clone())
                .one(txn)
                .await
                .map_err(db_err)?
                .ok_or_else(|| InventoryError::ClientNotFound(document.clone()))?;
            if !found.estado {
                return Err(InventoryError::ClientInactive(document.clone()));
            }
            Ok(found)
        }
    }
}

async fn lock_sale(txn: &DatabaseTransaction, sale_id: Uuid) -> Result<ventas::Model, InventoryError> {
    ventas::Entity::find_by_id(sale_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(InventoryError::SaleNotFound(sale_id))
}

async fn recorded_lines(
    txn: &DatabaseTransaction,
    sale_id: Uuid,
) -> Result<Vec<RecordedSaleLine>, InventoryError> {
    let rows = detalle_ventas::Entity::find()
        .filter(detalle_ventas::Column::VentaId.eq(sale_id))
        .order_by_asc(detalle_ventas::Column::Posicion)
        .all(txn)
        .await
        .map_err(db_err)?;
    Ok(rows
        .into_iter()
        .map(|row| RecordedSaleLine {
            producto_id: row.producto_id,
            cantidad: row.cantidad,
            factor_conversion: row.factor_conversion,
        })
        .collect())
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    sale_id: Uuid,
) -> Result<SaleDetail, InventoryError> {
    let sale = ventas::Entity::find_by_id(sale_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(InventoryError::SaleNotFound(sale_id))?;

    let client = clientes::Entity::find_by_id(sale.documentocliente.clone())
        .one(conn)
        .await
        .map_err(db_err)?;
    let (cliente, email_cliente) = client.map_or_else(
        || (String::new(), None),
        |client| (client.nombre, client.email),
    );

    let stored_lines = detalle_ventas::Entity::find()
        .filter(detalle_ventas::Column::VentaId.eq(sale_id))
        .order_by_asc(detalle_ventas::Column::Posicion)
        .all(conn)
        .await
        .map_err(db_err)?;

    let product_ids = distinct(stored_lines.iter().map(|l| l.producto_id));
    let names: HashMap<Uuid, String> = productos::Entity::find()
        .filter(productos::Column::Id.is_in(product_ids))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|product| (product.id, product.nombre))
        .collect();

    let lines = stored_lines
        .into_iter()
        .map(|line| SaleLineDetail {
            producto: names.get(&line.producto_id).cloned().unwrap_or_default(),
            line,
        })
        .collect();

    Ok(SaleDetail {
        sale,
        cliente,
        email_cliente,
        lines,
    })
}
