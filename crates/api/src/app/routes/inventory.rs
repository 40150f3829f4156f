use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use shopkit_core::SkuCode;
use shopkit_inventory::InventoryLevel;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(check_stock))
        .route("/levels", post(upsert_level))
        .route("/levels/:sku_code", get(get_level))
}

/// GET /inventory?sku_code=a&sku_code=b
///
/// The authority endpoint the order service batches against: one
/// `{sku_code, in_stock}` answer per requested SKU, unknown SKUs included
/// (as not in stock).
pub async fn check_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let mut sku_codes: BTreeSet<SkuCode> = BTreeSet::new();
    for (key, value) in params {
        if key != "sku_code" {
            continue;
        }
        match SkuCode::new(value) {
            Ok(sku) => {
                sku_codes.insert(sku);
            }
            Err(e) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
            }
        }
    }

    if sku_codes.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "at least one sku_code query parameter is required",
        );
    }

    match services.stock_statuses(&sku_codes).await {
        Ok(statuses) => (StatusCode::OK, Json(statuses)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn upsert_level(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::UpsertLevelRequest>,
) -> axum::response::Response {
    let sku_code = match SkuCode::new(body.sku_code) {
        Ok(s) => s,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
    };

    let level = InventoryLevel::new(sku_code, body.quantity);
    if let Err(e) = services.inventory_upsert(&level).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::level_to_json(&level))).into_response()
}

pub async fn get_level(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku_code): Path<String>,
) -> axum::response::Response {
    let sku_code = match SkuCode::new(sku_code) {
        Ok(s) => s,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
    };

    match services.inventory_get(&sku_code).await {
        Ok(Some(level)) => (StatusCode::OK, Json(dto::level_to_json(&level))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "sku not tracked"),
        Err(e) => errors::store_error_to_response(e),
    }
}
