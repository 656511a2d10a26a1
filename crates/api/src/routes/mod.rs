//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod purchases;
pub mod sales;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(purchases::routes())
        .merge(sales::routes())
}
