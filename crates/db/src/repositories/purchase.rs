//! Purchase repository: the purchase transaction engine.
//!
//! Every operation runs inside one [`UnitOfWork`]. The pure rules live in
//! [`PurchaseService`]; this module loads the rows they need, persists what
//! they decide, and notifies after commit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tendero_core::InventoryError;
use tendero_core::purchase::{
    CreatePurchaseInput, PurchaseService, RecordedPurchaseLine, ValidatedPurchase,
};
use tendero_shared::{InventoryConfig, Notifier, PurchaseReceipt, ReceiptLine};

use super::ledger::{distinct, factor_for, load_presentations, load_products, persist_changes};
use super::log_failure;
use crate::entities::{
    compras, detalle_compras, productos, proveedores, sea_orm_active_enums::PurchaseStatus,
};
use crate::error::{db_err, is_unique_violation};
use crate::unit_of_work::UnitOfWork;

/// A purchase line with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseLineDetail {
    /// Stored line.
    #[serde(flatten)]
    pub line: detalle_compras::Model,
    /// Product name.
    pub producto: String,
}

/// A purchase with its supplier name and lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseDetail {
    /// Stored purchase header.
    #[serde(flatten)]
    pub purchase: compras::Model,
    /// Supplier name.
    pub proveedor: String,
    /// Lines in application order.
    pub lines: Vec<PurchaseLineDetail>,
}

impl PurchaseDetail {
    /// Projection handed to the notifier.
    #[must_use]
    pub fn receipt(&self) -> PurchaseReceipt {
        PurchaseReceipt {
            id: self.purchase.id,
            nrodecompra: self.purchase.nrodecompra,
            fechadecompra: self.purchase.fechadecompra,
            nitproveedor: self.purchase.nitproveedor.clone(),
            proveedor: self.proveedor.clone(),
            total: self.purchase.total,
            lines: self
                .lines
                .iter()
                .map(|detail| ReceiptLine {
                    producto: detail.producto.clone(),
                    cantidad: detail.line.cantidad,
                    factor_conversion: detail.line.factor_conversion,
                    precio: detail.line.preciodecompra,
                    subtotal: detail.line.subtotal,
                })
                .collect(),
        }
    }
}

/// Purchase repository.
#[derive(Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
    void_window_days: i64,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn Notifier>, config: &InventoryConfig) -> Self {
        Self {
            db,
            notifier,
            void_window_days: config.purchase_void_window_days,
        }
    }

    /// Registers a purchase.
    ///
    /// Validates and consolidates the input, then, in one transaction, checks the
    /// supplier and purchase number, applies every line to the product ledger,
    /// and stores the purchase with its lines. The notifier runs after commit and
    /// its failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `InvalidSupplier`, `DuplicatePurchaseNumber`,
    /// `ProductNotFound`, `PresentationNotFound`, `InvalidPresentation`,
    /// `NegativeMargin`, or `Database`. Nothing is persisted on error.
    pub async fn create_purchase(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<PurchaseDetail, InventoryError> {
        let validated =
            PurchaseService::validate(&input).inspect_err(|e| log_failure("create_purchase", e))?;

        let uow = UnitOfWork::begin(&self.db).await.map_err(db_err)?;
        let result = Self::insert_purchase(uow.conn(), &validated).await;
        let detail = uow
            .finish(result)
            .await
            .inspect_err(|e| log_failure("create_purchase", e))?;

        info!(
            purchase_id = %detail.purchase.id,
            nrodecompra = detail.purchase.nrodecompra,
            total = %detail.purchase.total,
            lines = detail.lines.len(),
            "Purchase registered"
        );

        if let Err(err) = self.notifier.purchase_registered(&detail.receipt()).await {
            warn!(purchase_id = %detail.purchase.id, error = %err, "Purchase notification failed");
        }

        Ok(detail)
    }

    async fn insert_purchase(
        txn: &DatabaseTransaction,
        validated: &ValidatedPurchase,
    ) -> Result<PurchaseDetail, InventoryError> {
        let supplier = proveedores::Entity::find_by_id(validated.nitproveedor.clone())
            .one(txn)
            .await
            .map_err(db_err)?
            .filter(|supplier| supplier.estado)
            .ok_or_else(|| InventoryError::InvalidSupplier(validated.nitproveedor.clone()))?;

        let product_ids = distinct(validated.lines.iter().map(|l| l.producto_id));
        let presentation_ids = distinct(validated.lines.iter().map(|l| l.presentacion_id));
        let mut ledger = load_products(txn, &product_ids).await?;
        let presentations = load_presentations(txn, &presentation_ids).await?;

        let mut applied = Vec::with_capacity(validated.lines.len());
        for (index, line) in validated.lines.iter().enumerate() {
            let factor = factor_for(&presentations, line.producto_id, line.presentacion_id)?;
            let posicion = i32::try_from(index)
                .map_err(|_| InventoryError::Internal("too many purchase lines".to_string()))?;
            let result = PurchaseService::apply_line(&mut ledger, line, factor, posicion)?;
            debug!(
                product_id = %result.producto_id,
                unidades = result.unidades,
                preciocompra = %result.preciocompra_nuevo,
                precioventa = %result.precioventa_nuevo,
                "Purchase line applied"
            );
            applied.push(result);
        }

        let existing = compras::Entity::find()
            .filter(compras::Column::Nrodecompra.eq(validated.nrodecompra))
            .one(txn)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(InventoryError::DuplicatePurchaseNumber(validated.nrodecompra));
        }

        persist_changes(txn, &ledger.changes()).await?;

        let purchase = compras::ActiveModel {
            id: Set(Uuid::new_v4()),
            nrodecompra: Set(validated.nrodecompra),
            fechadecompra: Set(validated.fechadecompra),
            fechaderegistro: Set(Utc::now().fixed_offset()),
            estado: Set(PurchaseStatus::Active),
            total: Set(validated.total()?),
            nitproveedor: Set(supplier.nit.clone()),
            motivo_anulacion: Set(None),
        }
        .insert(txn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                InventoryError::DuplicatePurchaseNumber(validated.nrodecompra)
            } else {
                db_err(err)
            }
        })?;

        let mut lines = Vec::with_capacity(applied.len());
        for line in applied {
            let stored = detalle_compras::ActiveModel {
                id: Set(Uuid::new_v4()),
                compra_id: Set(purchase.id),
                producto_id: Set(line.producto_id),
                presentacion_id: Set(line.presentacion_id),
                posicion: Set(line.posicion),
                cantidad: Set(line.cantidad),
                factor_conversion: Set(line.factor_conversion),
                preciodecompra: Set(line.preciodecompra),
                subtotal: Set(line.subtotal),
                preciocompra_anterior: Set(line.preciocompra_anterior),
                precioventa_anterior: Set(line.precioventa_anterior),
            }
            .insert(txn)
            .await
            .map_err(db_err)?;

            let producto = ledger.product(line.producto_id)?.nombre.clone();
            lines.push(PurchaseLineDetail {
                line: stored,
                producto,
            });
        }

        Ok(PurchaseDetail {
            purchase,
            proveedor: supplier.nombre,
            lines,
        })
    }

    /// Voids a purchase, reversing its stock and restoring the prices it replaced.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseNotFound`, `AlreadyVoid`, `TooOld`,
    /// `StockAlreadyConsumed`, or `Database`. Nothing changes on error.
    pub async fn cancel_purchase(
        &self,
        purchase_id: Uuid,
        motivo: Option<String>,
    ) -> Result<PurchaseDetail, InventoryError> {
        let today = Utc::now().date_naive();

        let uow = UnitOfWork::begin(&self.db).await.map_err(db_err)?;
        let result = self
            .void_purchase(uow.conn(), purchase_id, motivo, today)
            .await;
        let detail = uow
            .finish(result)
            .await
            .inspect_err(|e| log_failure("cancel_purchase", e))?;

        info!(
            purchase_id = %purchase_id,
            nrodecompra = detail.purchase.nrodecompra,
            "Purchase voided"
        );
        Ok(detail)
    }

    async fn void_purchase(
        &self,
        txn: &DatabaseTransaction,
        purchase_id: Uuid,
        motivo: Option<String>,
        today: NaiveDate,
    ) -> Result<PurchaseDetail, InventoryError> {
        let purchase = compras::Entity::find_by_id(purchase_id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(InventoryError::PurchaseNotFound(purchase_id))?;

        PurchaseService::check_cancellable(
            purchase_id,
            purchase.estado.into(),
            purchase.fechadecompra,
            today,
            self.void_window_days,
        )?;

        let stored_lines = detalle_compras::Entity::find()
            .filter(detalle_compras::Column::CompraId.eq(purchase_id))
            .order_by_asc(detalle_compras::Column::Posicion)
            .all(txn)
            .await
            .map_err(db_err)?;

        let recorded: Vec<RecordedPurchaseLine> = stored_lines
            .iter()
            .map(|line| RecordedPurchaseLine {
                producto_id: line.producto_id,
                posicion: line.posicion,
                cantidad: line.cantidad,
                factor_conversion: line.factor_conversion,
                preciocompra_anterior: line.preciocompra_anterior,
                precioventa_anterior: line.precioventa_anterior,
            })
            .collect();

        let product_ids = distinct(recorded.iter().map(|l| l.producto_id));
        let mut ledger = load_products(txn, &product_ids).await?;
        PurchaseService::apply_cancellation(&mut ledger, &recorded)?;
        persist_changes(txn, &ledger.changes()).await?;

        let mut active: compras::ActiveModel = purchase.into();
        active.estado = Set(PurchaseStatus::Void);
        active.motivo_anulacion = Set(motivo
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()));
        active.update(txn).await.map_err(db_err)?;

        load_detail(txn, purchase_id).await
    }

    /// Reads a purchase with its lines.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseNotFound` or `Database`.
    pub async fn get_purchase(&self, purchase_id: Uuid) -> Result<PurchaseDetail, InventoryError> {
        load_detail(&self.db, purchase_id).await
    }
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    purchase_id: Uuid,
) -> Result<PurchaseDetail, InventoryError> {
    let purchase = compras::Entity::find_by_id(purchase_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(InventoryError::PurchaseNotFound(purchase_id))?;

    let proveedor = proveedores::Entity::find_by_id(purchase.nitproveedor.clone())
        .one(conn)
        .await
        .map_err(db_err)?
        .map(|supplier| supplier.nombre)
        .unwrap_or_default();

    let stored_lines = detalle_compras::Entity::find()
        .filter(detalle_compras::Column::CompraId.eq(purchase_id))
        .order_by_asc(detalle_compras::Column::Posicion)
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
        .map(|line| PurchaseLineDetail {
            producto: names.get(&line.producto_id).cloned().unwrap_or_default(),
            line,
        })
        .collect();

    Ok(PurchaseDetail {
        purchase,
        proveedor,
        lines,
    })
}
