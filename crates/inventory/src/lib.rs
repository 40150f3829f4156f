//! `shopkit-inventory` — inventory authority domain.

pub mod level;

pub use level::{InventoryLevel, StockStatus};
