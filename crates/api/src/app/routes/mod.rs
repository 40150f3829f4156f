use axum::{Router, routing::get};

pub mod inventory;
pub mod orders;
pub mod products;
pub mod system;

/// Router for all service endpoints (health is mounted separately).
pub fn router() -> Router {
    Router::new()
        .route("/stream", get(system::stream))
        .nest("/products", products::router())
        .nest("/inventory", inventory::router())
        .nest("/orders", orders::router())
}
