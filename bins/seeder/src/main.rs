//! Demo catalog seeder for Tendero development.
//!
//! Seeds a category, a supplier, a registered client, and a few products with
//! their presentations so purchases and sales can be exercised right away.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};
use tendero_db::entities::proveedores;
use tendero_db::{CatalogRepository, CreatePresentationInput, CreateProductInput};
use uuid::Uuid;

const DEMO_SUPPLIER_NIT: &str = "900123456";
const DEMO_CLIENT_DOC: &str = "1020304050";

/// (name, opening stock, unit cost, margin, presentations as (name, factor, default))
type DemoProduct = (
    &'static str,
    i64,
    &'static str,
    &'static str,
    &'static [(&'static str, i32, bool)],
);

const DEMO_PRODUCTS: &[DemoProduct] = &[
    (
        "Arroz Diana 500g",
        48,
        "1850",
        "25%",
        &[("Unidad", 1, true), ("Paca x 25", 25, false)],
    ),
    (
        "Huevo AA",
        60,
        "520",
        "30%",
        &[("Unidad", 1, true), ("Docena", 12, false), ("Panal x 30", 30, false)],
    ),
    (
        "Aceite Premier 1L",
        12,
        "8900",
        "0,2",
        &[("Unidad", 1, true), ("Caja x 12", 12, false)],
    ),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tendero_db::connect(&database_url, 2, 1)
        .await
        .expect("Failed to connect to database");

    if already_seeded(&db).await {
        println!("Demo supplier already exists, skipping.");
        return;
    }

    let catalog = CatalogRepository::new(db.clone());

    println!("Seeding supplier and client...");
    catalog
        .create_supplier(DEMO_SUPPLIER_NIT, "Distribuidora La Esquina", None)
        .await
        .expect("Failed to seed supplier");
    catalog
        .create_client(DEMO_CLIENT_DOC, "Ana Gómez", Some("ana@example.com".to_string()))
        .await
        .expect("Failed to seed client");

    println!("Seeding category...");
    let category = catalog
        .create_category("Abarrotes")
        .await
        .expect("Failed to seed category");

    println!("Seeding products...");
    for &(nombre, stock, cost, margin, presentations) in DEMO_PRODUCTS {
        let product = catalog
            .create_product(CreateProductInput {
                categoria_id: Some(category.id),
                nombre: nombre.to_string(),
                stock,
                preciocompra: Decimal::from_str(cost).expect("valid demo cost"),
                margenganancia: margin.to_string(),
            })
            .await
            .expect("Failed to seed product");

        for &(presentation, factor, default) in presentations {
            seed_presentation(&catalog, product.id, presentation, factor, default).await;
        }
        println!(
            "  {nombre}: stock {stock}, precioventa {}",
            product.precioventa
        );
    }

    println!("Seeding complete!");
}

async fn already_seeded(db: &DatabaseConnection) -> bool {
    proveedores::Entity::find_by_id(DEMO_SUPPLIER_NIT.to_string())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
}

async fn seed_presentation(
    catalog: &CatalogRepository,
    producto_id: Uuid,
    nombre: &str,
    factor_conversion: i32,
    es_predeterminada: bool,
) {
    catalog
        .create_presentation(CreatePresentationInput {
            producto_id,
            nombre: nombre.to_string(),
            factor_conversion,
            es_predeterminada,
            codigo_barras: None,
        })
        .await
        .expect("Failed to seed presentation");
}
