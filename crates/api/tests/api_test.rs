//! Router-level tests: requests go through the full Axum stack into the
//! engines, backed by an in-memory SQLite database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use tendero_api::{AppState, create_router};
use tendero_db::migration::Migrator;
use tendero_db::{CatalogRepository, CreatePresentationInput, CreateProductInput};
use tendero_shared::{InventoryConfig, NoopNotifier};

struct Fixture {
    app: Router,
    product_id: Uuid,
    docena_id: Uuid,
}

async fn setup() -> Fixture {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db: DatabaseConnection = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let catalog = CatalogRepository::new(db.clone());
    catalog
        .create_supplier("900123456", "Distribuidora La Esquina", None)
        .await
        .unwrap();
    let product = catalog
        .create_product(CreateProductInput {
            categoria_id: None,
            nombre: "Arroz".to_string(),
            stock: 100,
            preciocompra: dec!(50),
            margenganancia: "30%".to_string(),
        })
        .await
        .unwrap();
    let docena = catalog
        .create_presentation(CreatePresentationInput {
            producto_id: product.id,
            nombre: "Docena".to_string(),
            factor_conversion: 12,
            es_predeterminada: false,
            codigo_barras: None,
        })
        .await
        .unwrap();

    let state = AppState::new(db, Arc::new(NoopNotifier), &InventoryConfig::default());
    Fixture {
        app: create_router(state),
        product_id: product.id,
        docena_id: docena.id,
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn test_health() {
    let fixture = setup().await;

    let (status, body) = send(&fixture.app, "GET", "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_purchase_lifecycle() {
    let fixture = setup().await;

    let (status, created) = send(
        &fixture.app,
        "POST",
        "/api/v1/purchases",
        Some(json!({
            "nrodecompra": 1,
            "fechadecompra": today(),
            "nitproveedor": "900123456",
            "lines": [{
                "idproducto": fixture.product_id,
                "idpresentacion": fixture.docena_id,
                "cantidad": 5,
                "preciodecompra": "1000"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["estado"], "ACTIVE");
    assert_eq!(created["proveedor"], "Distribuidora La Esquina");
    assert_eq!(created["lines"][0]["producto"], "Arroz");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&fixture.app, "GET", &format!("/api/v1/purchases/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["nrodecompra"], 1);

    let (status, voided) = send(
        &fixture.app,
        "POST",
        &format!("/api/v1/purchases/{id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voided["estado"], "VOID");

    let (status, again) = send(
        &fixture.app,
        "POST",
        &format!("/api/v1/purchases/{id}/cancel"),
        Some(json!({ "motivo": "otra vez" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["kind"], "ConflictError");
    assert_eq!(again["code"], "ALREADY_VOID");
}

#[tokio::test]
async fn test_purchase_validation_error() {
    let fixture = setup().await;

    let (status, body) = send(
        &fixture.app,
        "POST",
        "/api/v1/purchases",
        Some(json!({
            "nrodecompra": 2,
            "fechadecompra": "19/10/2026",
            "nitproveedor": "900123456",
            "lines": []
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ValidationError");
    assert_eq!(body["code"], "INVALID_FIELD");
}

#[tokio::test]
async fn test_mobile_order_flow_and_stock_errors() {
    let fixture = setup().await;

    let (status, order) = send(
        &fixture.app,
        "POST",
        "/api/v1/sales",
        Some(json!({
            "tipo": "PEDIDO_MOVIL",
            "lines": [{
                "idproducto": fixture.product_id,
                "idpresentacion": fixture.docena_id,
                "cantidad": 9
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["estado"], "PENDIENTE");
    let id = order["id"].as_str().unwrap().to_string();

    // 108 units requested, 100 on hand.
    let (status, body) = send(&fixture.app, "POST", &format!("/api/v1/sales/{id}/confirm"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "BusinessRuleError");
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (status, body) = send(
        &fixture.app,
        "POST",
        &format!("/api/v1/sales/{id}/cancel"),
        Some(json!({ "motivo": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MOTIVE_REQUIRED");

    let (status, body) =
        send(&fixture.app, "POST", &format!("/api/v1/sales/{id}/cancel"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ValidationError");
    assert_eq!(body["code"], "MOTIVE_REQUIRED");

    let (status, cancelled) = send(
        &fixture.app,
        "POST",
        &format!("/api/v1/sales/{id}/cancel"),
        Some(json!({ "motivo": "Cliente no contesta" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["estado"], "ANULADA");
    assert_eq!(cancelled["motivo_anulacion"], "Cliente no contesta");
}

#[tokio::test]
async fn test_direct_sale_is_completed() {
    let fixture = setup().await;

    let (status, sale) = send(
        &fixture.app,
        "POST",
        "/api/v1/sales",
        Some(json!({
            "documentocliente": "",
            "tipo": "VENTA_DIRECTA",
            "lines": [{
                "idproducto": fixture.product_id,
                "idpresentacion": fixture.docena_id,
                "cantidad": 1
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["estado"], "COMPLETADA");
    assert_eq!(sale["tipo"], "VENTA_DIRECTA");
    assert_eq!(sale["documentocliente"], "222222222222");
    assert!(sale.get("email_cliente").is_none());
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let fixture = setup().await;
    let missing = Uuid::new_v4();

    let (status, body) = send(&fixture.app, "GET", &format!("/api/v1/sales/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SALE_NOT_FOUND");

    let (status, body) =
        send(&fixture.app, "GET", &format!("/api/v1/purchases/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFoundError");
}
