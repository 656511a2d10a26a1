//! Integration tests for the sale engine: direct sales, mobile orders,
//! confirmation, and cancellation.

mod common;

use std::sync::Arc;

use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use tendero_core::InventoryError;
use tendero_core::sale::SaleStatus as EngineSaleStatus;
use tendero_db::entities::{
    clientes, detalle_ventas,
    sea_orm_active_enums::{SaleStatus, SaleType},
    ventas,
};
use tendero_db::{CatalogRepository, GENERIC_CONSUMER_NAME, SaleRepository};
use tendero_shared::NoopNotifier;

use common::{
    CLIENT_DOC, create_client, create_product, inventory_config, product, recording, sale_input,
    setup_db,
};

fn repo(db: &sea_orm::DatabaseConnection) -> SaleRepository {
    SaleRepository::new(db.clone(), Arc::new(NoopNotifier), &inventory_config())
}

// ============================================================================
// Direct sales
// ============================================================================

#[tokio::test]
async fn test_direct_sale_deducts_stock_and_completes() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;

    let detail = repo(&db)
        .create_sale(sale_input(
            None,
            "VENTA_DIRECTA",
            &[(arroz.id, arroz.docena, 1), (arroz.id, arroz.unidad, 3)],
        ))
        .await
        .expect("sale should succeed");

    assert_eq!(detail.sale.estado, SaleStatus::Completada);
    assert_eq!(detail.sale.tipo, SaleType::VentaDirecta);
    assert_eq!(detail.sale.total, dec!(2250));
    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.lines[0].line.precioventa, dec!(150));
    assert_eq!(product(&db, arroz.id).await.stock, 15);
}

#[tokio::test]
async fn test_direct_sale_consolidates_duplicate_lines() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;

    let detail = repo(&db)
        .create_sale(sale_input(
            None,
            "venta_directa",
            &[(arroz.id, arroz.unidad, 2), (arroz.id, arroz.unidad, 4)],
        ))
        .await
        .unwrap();

    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].line.cantidad, 6);
    assert_eq!(product(&db, arroz.id).await.stock, 24);
}

#[tokio::test]
async fn test_sale_lines_are_read_back_in_entry_order() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;
    let frijol = create_product(&db, "Fríjol", 30, dec!(70), "0.3").await;
    let repo = repo(&db);

    let created = repo
        .create_sale(sale_input(
            None,
            "VENTA_DIRECTA",
            &[
                (frijol.id, frijol.unidad, 1),
                (arroz.id, arroz.docena, 1),
                (arroz.id, arroz.unidad, 2),
            ],
        ))
        .await
        .unwrap();
    let fetched = repo.get_sale(created.sale.id).await.unwrap();

    let order: Vec<(&str, i32, i32)> = fetched
        .lines
        .iter()
        .map(|l| (l.producto.as_str(), l.line.posicion, l.line.factor_conversion))
        .collect();
    assert_eq!(order, vec![("Fríjol", 0, 1), ("Arroz", 1, 12), ("Arroz", 2, 1)]);
}

#[tokio::test]
async fn test_insufficient_stock_leaves_no_trace() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 15, dec!(80), "0.3").await;
    let frijol = create_product(&db, "Fríjol", 5, dec!(70), "0.3").await;

    let result = repo(&db)
        .create_sale(sale_input(
            None,
            "VENTA_DIRECTA",
            &[(arroz.id, arroz.docena, 1), (frijol.id, frijol.unidad, 6)],
        ))
        .await;

    assert!(matches!(
        result,
        Err(InventoryError::InsufficientStock { product_id, requested: 6, available: 5 })
            if product_id == frijol.id
    ));
    assert_eq!(product(&db, arroz.id).await.stock, 15);
    assert_eq!(product(&db, frijol.id).await.stock, 5);
    assert_eq!(ventas::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(detalle_ventas::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_inactive_product_is_rejected() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 15, dec!(80), "0.3").await;
    CatalogRepository::new(db.clone())
        .set_product_status(arroz.id, false)
        .await
        .unwrap();

    let result = repo(&db)
        .create_sale(sale_input(None, "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 1)]))
        .await;

    assert!(matches!(result, Err(InventoryError::ProductInactive(id)) if id == arroz.id));
    assert_eq!(product(&db, arroz.id).await.stock, 15);
}

#[tokio::test]
async fn test_unknown_sale_type_is_rejected() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 15, dec!(80), "0.3").await;

    let result = repo(&db)
        .create_sale(sale_input(None, "TRUEQUE", &[(arroz.id, arroz.unidad, 1)]))
        .await;

    assert!(matches!(result, Err(InventoryError::InvalidType(ref t)) if t == "TRUEQUE"));
}

// ============================================================================
// Clients
// ============================================================================

#[tokio::test]
async fn test_generic_consumer_is_created_once() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;
    let repo = repo(&db);
    let generic = inventory_config().generic_consumer_document;

    let first = repo
        .create_sale(sale_input(None, "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 1)]))
        .await
        .unwrap();
    let second = repo
        .create_sale(sale_input(Some("  "), "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 1)]))
        .await
        .unwrap();
    let third = repo
        .create_sale(sale_input(Some(generic.as_str()), "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 1)]))
        .await
        .unwrap();

    for detail in [&first, &second, &third] {
        assert_eq!(detail.sale.documentocliente, generic);
        assert_eq!(detail.cliente, GENERIC_CONSUMER_NAME);
    }
    assert_eq!(clientes::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_registered_client_receives_receipt() {
    let db = setup_db().await;
    create_client(&db).await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;
    let notifier = recording();
    let repo = SaleRepository::new(db.clone(), notifier.clone(), &inventory_config());

    let detail = repo
        .create_sale(sale_input(Some(CLIENT_DOC), "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 2)]))
        .await
        .unwrap();

    assert_eq!(detail.cliente, "Ana Gómez");
    let receipts = notifier.sales.lock().unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].email_cliente.as_deref(), Some("ana@example.com"));
    assert_eq!(receipts[0].estado, "COMPLETADA");
    assert_eq!(receipts[0].total, dec!(300));
}

#[tokio::test]
async fn test_unknown_client_is_rejected() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;

    let result = repo(&db)
        .create_sale(sale_input(Some("999"), "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 1)]))
        .await;

    assert!(matches!(result, Err(InventoryError::ClientNotFound(ref doc)) if doc == "999"));
    assert_eq!(product(&db, arroz.id).await.stock, 30);
}

#[tokio::test]
async fn test_inactive_client_is_rejected() {
    let db = setup_db().await;
    create_client(&db).await;
    CatalogRepository::new(db.clone())
        .set_client_status(CLIENT_DOC, false)
        .await
        .unwrap();
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;

    let result = repo(&db)
        .create_sale(sale_input(Some(CLIENT_DOC), "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 1)]))
        .await;

    assert!(matches!(result, Err(InventoryError::ClientInactive(_))));
}

// ============================================================================
// Mobile orders
// ============================================================================

#[tokio::test]
async fn test_mobile_order_takes_stock_on_confirmation() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;
    let repo = repo(&db);

    let order = repo
        .create_sale(sale_input(None, "PEDIDO_MOVIL", &[(arroz.id, arroz.docena, 2)]))
        .await
        .unwrap();
    assert_eq!(order.sale.estado, SaleStatus::Pendiente);
    assert_eq!(product(&db, arroz.id).await.stock, 30);

    let confirmed = repo.confirm_sale(order.sale.id).await.unwrap();
    assert_eq!(confirmed.sale.estado, SaleStatus::Completada);
    assert_eq!(product(&db, arroz.id).await.stock, 6);

    let again = repo.confirm_sale(order.sale.id).await;
    assert!(matches!(
        again,
        Err(InventoryError::InvalidState {
            from: EngineSaleStatus::Completada,
            to: EngineSaleStatus::Completada
        })
    ));
    assert_eq!(product(&db, arroz.id).await.stock, 6);
}

#[tokio::test]
async fn test_mobile_order_accepted_beyond_stock_but_not_confirmed() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 10, dec!(80), "0.3").await;
    let repo = repo(&db);

    let order = repo
        .create_sale(sale_input(None, "PEDIDO_MOVIL", &[(arroz.id, arroz.docena, 1)]))
        .await
        .unwrap();

    let result = repo.confirm_sale(order.sale.id).await;

    assert!(matches!(
        result,
        Err(InventoryError::InsufficientStock { requested: 12, available: 10, .. })
    ));
    let fetched = repo.get_sale(order.sale.id).await.unwrap();
    assert_eq!(fetched.sale.estado, SaleStatus::Pendiente);
    assert_eq!(product(&db, arroz.id).await.stock, 10);
}

#[tokio::test]
async fn test_confirm_unknown_sale() {
    let db = setup_db().await;
    let missing = Uuid::new_v4();

    let result = repo(&db).confirm_sale(missing).await;

    assert!(matches!(result, Err(InventoryError::SaleNotFound(id)) if id == missing));
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_completed_sale_restores_stock() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;
    let repo = repo(&db);

    let sale = repo
        .create_sale(sale_input(None, "VENTA_DIRECTA", &[(arroz.id, arroz.docena, 2)]))
        .await
        .unwrap();
    assert_eq!(product(&db, arroz.id).await.stock, 6);

    let cancelled = repo
        .cancel_sale(sale.sale.id, Some("Cliente devolvió".to_string()))
        .await
        .unwrap();

    assert_eq!(cancelled.sale.estado, SaleStatus::Anulada);
    assert_eq!(cancelled.sale.motivo_anulacion.as_deref(), Some("Cliente devolvió"));
    assert_eq!(product(&db, arroz.id).await.stock, 30);
}

#[tokio::test]
async fn test_cancel_pending_order_leaves_stock_alone() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;
    let repo = repo(&db);

    let order = repo
        .create_sale(sale_input(None, "PEDIDO_MOVIL", &[(arroz.id, arroz.docena, 2)]))
        .await
        .unwrap();
    let cancelled = repo
        .cancel_sale(order.sale.id, Some("Sin respuesta".to_string()))
        .await
        .unwrap();

    assert_eq!(cancelled.sale.estado, SaleStatus::Anulada);
    assert_eq!(product(&db, arroz.id).await.stock, 30);

    let confirm = repo.confirm_sale(order.sale.id).await;
    assert!(matches!(confirm, Err(InventoryError::InvalidState { .. })));
}

#[tokio::test]
async fn test_cancel_requires_motive_and_happens_once() {
    let db = setup_db().await;
    let arroz = create_product(&db, "Arroz", 30, dec!(80), "0.3").await;
    let repo = repo(&db);

    let sale = repo
        .create_sale(sale_input(None, "VENTA_DIRECTA", &[(arroz.id, arroz.unidad, 5)]))
        .await
        .unwrap();

    let blank = repo.cancel_sale(sale.sale.id, Some("   ".to_string())).await;
    assert!(matches!(blank, Err(InventoryError::MotiveRequired)));
    assert_eq!(product(&db, arroz.id).await.stock, 25);

    repo.cancel_sale(sale.sale.id, Some("Error de caja".to_string()))
        .await
        .unwrap();
    let again = repo
        .cancel_sale(sale.sale.id, Some("Error de caja".to_string()))
        .await;
    assert!(matches!(again, Err(InventoryError::AlreadyVoid(id)) if id == sale.sale.id));
    assert_eq!(product(&db, arroz.id).await.stock, 30);
}

#[tokio::test]
async fn test_get_unknown_sale() {
    let db = setup_db().await;
    let missing = Uuid::new_v4();

    let result = repo(&db).get_sale(missing).await;

    assert!(matches!(result, Err(InventoryError::SaleNotFound(id)) if id == missing));
}
