//! Purchase routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use tendero_core::purchase::CreatePurchaseInput;

use crate::AppState;
use crate::error::ApiError;

/// Creates the purchase routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", post(create_purchase))
        .route("/purchases/{purchase_id}", get(get_purchase))
        .route("/purchases/{purchase_id}/cancel", post(cancel_purchase))
}

/// Request body for voiding a purchase.
#[derive(Debug, Default, Deserialize)]
pub struct CancelPurchaseRequest {
    /// Optional reason.
    pub motivo: Option<String>,
}

/// POST `/purchases` - Register a purchase.
async fn create_purchase(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseInput>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.purchases.create_purchase(payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET `/purchases/{purchase_id}` - Read a purchase with its lines.
async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.purchases.get_purchase(purchase_id).await?;
    Ok(Json(detail))
}

/// POST `/purchases/{purchase_id}/cancel` - Void a purchase.
async fn cancel_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    payload: Option<Json<CancelPurchaseRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.unwrap_or_default();
    let detail = state
        .purchases
        .cancel_purchase(purchase_id, request.motivo)
        .await?;
    Ok(Json(detail))
}
