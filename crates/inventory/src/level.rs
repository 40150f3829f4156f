use serde::{Deserialize, Serialize};

use shopkit_core::SkuCode;

/// On-hand quantity for one SKU.
///
/// Quantity is signed: oversold stock (returns in flight, reconciliation
/// drift) shows up as a negative level rather than being clamped away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub sku_code: SkuCode,
    pub quantity: i64,
}

impl InventoryLevel {
    pub fn new(sku_code: SkuCode, quantity: i64) -> Self {
        Self { sku_code, quantity }
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }

    pub fn status(&self) -> StockStatus {
        StockStatus {
            sku_code: self.sku_code.clone(),
            in_stock: self.is_in_stock(),
        }
    }
}

/// Per-SKU answer the inventory authority hands to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatus {
    pub sku_code: SkuCode,
    pub in_stock: bool,
}

impl StockStatus {
    /// Answer for a SKU the authority has no record of: not in stock.
    pub fn unknown(sku_code: SkuCode) -> Self {
        Self {
            sku_code,
            in_stock: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(code: &str) -> SkuCode {
        SkuCode::new(code).unwrap()
    }

    #[test]
    fn positive_quantity_is_in_stock() {
        assert!(InventoryLevel::new(sku("a"), 1).is_in_stock());
        assert!(InventoryLevel::new(sku("a"), 500).is_in_stock());
    }

    #[test]
    fn zero_or_negative_quantity_is_out_of_stock() {
        assert!(!InventoryLevel::new(sku("a"), 0).is_in_stock());
        assert!(!InventoryLevel::new(sku("a"), -3).is_in_stock());
    }

    #[test]
    fn unknown_sku_answers_not_in_stock() {
        let status = StockStatus::unknown(sku("ghost"));
        assert!(!status.in_stock);
    }
}
