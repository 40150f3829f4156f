//! `shopkit-infra` — adapters behind the domain ports.
//!
//! Every store comes in an in-memory flavor (dev/test) and a Postgres flavor
//! (persistent wiring); the stock checker comes as an in-process adapter and
//! as an HTTP client against a remote inventory authority.

pub mod config;
pub mod inventory_client;
pub mod inventory_store;
pub mod order_store;
pub mod product_store;
pub mod publisher;
pub mod stock;
pub mod store;

pub use config::AppConfig;
pub use inventory_client::HttpInventoryClient;
pub use inventory_store::{InMemoryInventoryStore, InventoryLevelStore, PostgresInventoryStore};
pub use order_store::{InMemoryOrderStore, PostgresOrderStore};
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore};
pub use publisher::{ChannelEventPublisher, OrderEventBus};
pub use stock::LocalStockChecker;
pub use store::StoreError;
