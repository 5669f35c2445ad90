use axum::{Extension, Json};
use serde_json::Value;

use minishop_core::OrderReceipt;

use crate::middleware::RequestId;

use super::ApiError;

pub(super) async fn submit_checkout(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<Value>,
) -> Result<Json<OrderReceipt>, ApiError> {
    let cart = minishop_core::parse_cart(&body).map_err(|e| {
        tracing::warn!(request_id = %req_id.0, error = %e, "rejected checkout payload");
        ApiError::validation(e.to_string())
    })?;

    let receipt = minishop_core::place_order();
    tracing::info!(
        request_id = %req_id.0,
        lines = cart.len(),
        order_id = %receipt.order_id,
        "new order received"
    );
    Ok(Json(receipt))
}
