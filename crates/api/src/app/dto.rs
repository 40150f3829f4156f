use serde::Deserialize;

use shopkit_inventory::InventoryLevel;
use shopkit_orders::{LineItemRequest, Order};
use shopkit_products::Product;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku_code: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpsertLevelRequest {
    pub sku_code: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub order_line_items: Vec<LineItemRequest>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id().to_string(),
        "sku_code": product.sku_code().as_str(),
        "name": product.name(),
        "description": product.description(),
        "price": product.price(),
        "created_at": product.created_at().to_rfc3339(),
    })
}

pub fn level_to_json(level: &InventoryLevel) -> serde_json::Value {
    serde_json::json!({
        "sku_code": level.sku_code.as_str(),
        "quantity": level.quantity,
        "in_stock": level.is_in_stock(),
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": order.id().to_string(),
        "placed_at": order.placed_at().to_rfc3339(),
        "order_line_items": order.line_items().iter().map(|line| serde_json::json!({
            "sku_code": line.sku_code().as_str(),
            "unit_price": line.unit_price(),
            "quantity": line.quantity(),
        })).collect::<Vec<_>>(),
    })
}
