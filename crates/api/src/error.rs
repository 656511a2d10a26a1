//! JSON rendering of inventory errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use tendero_core::InventoryError;
use tendero_shared::AppError;

/// An inventory error on its way out as an HTTP response.
///
/// Renders `{ "kind", "code", "message" }`. Storage and internal failures
/// carry a generic message.
#[derive(Debug)]
pub struct ApiError(pub InventoryError);

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.0.error_code();
        let app_error = AppError::from(self.0);

        (
            status,
            Json(json!({
                "kind": app_error.kind(),
                "code": code,
                "message": app_error.public_message(),
            })),
        )
            .into_response()
    }
}
