//! In-process stock checker for the in-memory wiring.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use shopkit_core::SkuCode;
use shopkit_orders::{StockChecker, UnavailableError};

use crate::inventory_store::InventoryLevelStore;

/// Answers stock checks from a local level store instead of a remote
/// authority. Used by the in-memory wiring; the contract (including the
/// every-SKU-answered shape) matches the HTTP client's.
pub struct LocalStockChecker<L> {
    levels: L,
}

impl<L> LocalStockChecker<L> {
    pub fn new(levels: L) -> Self {
        Self { levels }
    }
}

#[async_trait]
impl<L> StockChecker for LocalStockChecker<L>
where
    L: InventoryLevelStore,
{
    async fn check_stock(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<HashMap<SkuCode, bool>, UnavailableError> {
        let found = self
            .levels
            .get_many(sku_codes)
            .await
            .map_err(|e| UnavailableError(e.to_string()))?;

        // Unknown SKUs answer false, same as the HTTP authority.
        let mut stock: HashMap<SkuCode, bool> =
            sku_codes.iter().cloned().map(|sku| (sku, false)).collect();
        for level in found {
            let in_stock = level.is_in_stock();
            stock.insert(level.sku_code, in_stock);
        }

        Ok(stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use shopkit_inventory::InventoryLevel;

    use crate::inventory_store::InMemoryInventoryStore;

    fn sku(code: &str) -> SkuCode {
        SkuCode::new(code).unwrap()
    }

    #[tokio::test]
    async fn answers_every_requested_sku() {
        let store = Arc::new(InMemoryInventoryStore::new());
        store
            .upsert(&InventoryLevel::new(sku("a"), 5))
            .await
            .unwrap();
        store
            .upsert(&InventoryLevel::new(sku("b"), 0))
            .await
            .unwrap();

        let checker = LocalStockChecker::new(store);
        let request: BTreeSet<SkuCode> = [sku("a"), sku("b"), sku("ghost")].into_iter().collect();
        let stock = checker.check_stock(&request).await.unwrap();

        assert_eq!(stock.len(), 3);
        assert_eq!(stock[&sku("a")], true);
        assert_eq!(stock[&sku("b")], false);
        assert_eq!(stock[&sku("ghost")], false);
    }
}
