//! Product ledger persistence.
//!
//! Loads product rows into a [`ProductLedger`] with row locks and writes the
//! ledger's net changes back. Both functions take the caller's transaction, so
//! they cannot run outside an active [`UnitOfWork`](crate::UnitOfWork).

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect,
    sea_query::Expr,
};
use tracing::debug;
use uuid::Uuid;

use tendero_core::InventoryError;
use tendero_core::ledger::{LedgerChange, ProductLedger, ProductState};
use tendero_core::units::PresentationInfo;

use crate::entities::{presentaciones, productos};
use crate::error::db_err;

impl From<productos::Model> for ProductState {
    fn from(model: productos::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            stock: model.stock,
            preciocompra: model.preciocompra,
            precioventa: model.precioventa,
            margenganancia: model.margenganancia,
            estado: model.estado,
        }
    }
}

impl From<&presentaciones::Model> for PresentationInfo {
    fn from(model: &presentaciones::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.producto_id,
            factor_conversion: model.factor_conversion,
        }
    }
}

/// Returns the distinct IDs in first-appearance order.
pub(crate) fn distinct(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Locks the given products (`SELECT ... FOR UPDATE`) and loads them into a ledger.
///
/// Products are loaded in the order given.
///
/// # Errors
///
/// Returns `ProductNotFound` for the first missing product, or `Database`.
pub async fn load_products(
    txn: &DatabaseTransaction,
    product_ids: &[Uuid],
) -> Result<ProductLedger, InventoryError> {
    // Lock in a stable order so concurrent operations cannot deadlock.
    let mut sorted = product_ids.to_vec();
    sorted.sort_unstable();

    let rows = productos::Entity::find()
        .filter(productos::Column::Id.is_in(sorted))
        .lock_exclusive()
        .all(txn)
        .await
        .map_err(db_err)?;

    let mut by_id: HashMap<Uuid, productos::Model> =
        rows.into_iter().map(|row| (row.id, row)).collect();

    let mut ledger = ProductLedger::new();
    for id in product_ids {
        if ledger.contains(*id) {
            continue;
        }
        let row = by_id.remove(id).ok_or(InventoryError::ProductNotFound(*id))?;
        ledger.load(row.into());
    }
    Ok(ledger)
}

/// Loads presentations by ID.
///
/// # Errors
///
/// Returns `Database` if the query fails.
pub async fn load_presentations(
    txn: &DatabaseTransaction,
    presentation_ids: &[Uuid],
) -> Result<HashMap<Uuid, presentaciones::Model>, InventoryError> {
    let rows = presentaciones::Entity::find()
        .filter(presentaciones::Column::Id.is_in(presentation_ids.to_vec()))
        .all(txn)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().map(|row| (row.id, row)).collect())
}

/// Resolves the conversion factor of a line against the loaded presentations.
///
/// # Errors
///
/// Returns `PresentationNotFound` if the presentation does not exist, or
/// `InvalidPresentation` if it belongs to another product.
pub fn factor_for(
    presentations: &HashMap<Uuid, presentaciones::Model>,
    product_id: Uuid,
    presentation_id: Uuid,
) -> Result<i32, InventoryError> {
    let presentation = presentations
        .get(&presentation_id)
        .ok_or(InventoryError::PresentationNotFound(presentation_id))?;
    tendero_core::units::resolve_factor(product_id, presentation_id, |_| {
        Some(PresentationInfo::from(presentation))
    })
}

/// Writes the ledger's net changes.
///
/// Stock moves as `stock = stock + delta`; decrements carry a `stock >= units`
/// guard so a concurrent writer can never push stock below zero.
///
/// # Errors
///
/// Returns `InsufficientStock` if a guarded decrement matches no row,
/// `ProductNotFound` if the product vanished, or `Database`.
pub async fn persist_changes(
    txn: &DatabaseTransaction,
    changes: &[LedgerChange],
) -> Result<(), InventoryError> {
    for change in changes {
        let mut update =
            productos::Entity::update_many().filter(productos::Column::Id.eq(change.product_id));

        if change.stock_delta != 0 {
            update = update.col_expr(
                productos::Column::Stock,
                Expr::col(productos::Column::Stock).add(change.stock_delta),
            );
            if change.stock_delta < 0 {
                update = update.filter(productos::Column::Stock.gte(change.required_stock()));
            }
        }
        if let Some(price) = change.price {
            update = update
                .col_expr(productos::Column::Preciocompra, Expr::value(price.preciocompra))
                .col_expr(productos::Column::Precioventa, Expr::value(price.precioventa));
        }

        let result = update.exec(txn).await.map_err(db_err)?;
        if result.rows_affected == 0 {
            let current = productos::Entity::find_by_id(change.product_id)
                .one(txn)
                .await
                .map_err(db_err)?;
            return Err(match current {
                Some(row) => InventoryError::InsufficientStock {
                    product_id: change.product_id,
                    requested: change.required_stock(),
                    available: row.stock,
                },
                None => InventoryError::ProductNotFound(change.product_id),
            });
        }

        debug!(
            product_id = %change.product_id,
            stock_delta = change.stock_delta,
            price_updated = change.price.is_some(),
            "Ledger change persisted"
        );
    }
    Ok(())
}
