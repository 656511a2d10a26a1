//! Sale and mobile order routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use tendero_core::sale::CreateSaleInput;

use crate::AppState;
use crate::error::ApiError;

/// Creates the sale routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", post(create_sale))
        .route("/sales/{sale_id}", get(get_sale))
        .route("/sales/{sale_id}/confirm", post(confirm_sale))
        .route("/sales/{sale_id}/cancel", post(cancel_sale))
}

/// Request body for cancelling a sale.
#[derive(Debug, Default, Deserialize)]
pub struct CancelSaleRequest {
    /// Reason, required and non-blank.
    pub motivo: Option<String>,
}

/// POST `/sales` - Register a direct sale or a mobile order.
async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.sales.create_sale(payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET `/sales/{sale_id}` - Read a sale with its lines.
async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.sales.get_sale(sale_id).await?;
    Ok(Json(detail))
}

/// POST `/sales/{sale_id}/confirm` - Confirm a pending mobile order.
async fn confirm_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.sales.confirm_sale(sale_id).await?;
    Ok(Json(detail))
}

/// POST `/sales/{sale_id}/cancel` - Cancel a sale or mobile order.
async fn cancel_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    payload: Option<Json<CancelSaleRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.unwrap_or_default();
    let detail = state.sales.cancel_sale(sale_id, request.motivo).await?;
    Ok(Json(detail))
}
