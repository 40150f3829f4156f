use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopkit_infra::StoreError;
use shopkit_orders::{PlaceOrderError, StorageError};

/// Map a placement failure to its client-visible outcome.
///
/// Out-of-stock is a business rejection the caller can correct (422), an
/// unreachable authority is a transient fault worth retrying (503), storage
/// failure is ours (500).
pub fn place_order_error_to_response(err: PlaceOrderError) -> axum::response::Response {
    match err {
        PlaceOrderError::InvalidRequest(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_request", msg)
        }
        PlaceOrderError::OutOfStock { sku_codes } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({
                "error": "out_of_stock",
                "message": "one or more products are not in stock, please try again later",
                "sku_codes": sku_codes.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        PlaceOrderError::InventoryUnreachable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "inventory_unreachable", msg)
        }
        PlaceOrderError::Storage(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        err.to_string(),
    )
}

pub fn storage_error_to_response(err: StorageError) -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "storage_error",
        err.to_string(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
