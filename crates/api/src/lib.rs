//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for purchases, sales, and mobile orders
//! - JSON error rendering for inventory errors
//! - Response types

pub mod error;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tendero_db::{PurchaseRepository, SaleRepository};
use tendero_shared::{InventoryConfig, Notifier};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Purchase engine.
    pub purchases: PurchaseRepository,
    /// Sale engine.
    pub sales: SaleRepository,
}

impl AppState {
    /// Builds the state, wiring both engines to the same pool and notifier.
    pub fn new(
        db: DatabaseConnection,
        notifier: Arc<dyn Notifier>,
        inventory: &InventoryConfig,
    ) -> Self {
        Self {
            purchases: PurchaseRepository::new(db.clone(), notifier.clone(), inventory),
            sales: SaleRepository::new(db.clone(), notifier, inventory),
            db: Arc::new(db),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
