//! Inventory level storage (the authority's own data).

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use shopkit_core::SkuCode;
use shopkit_inventory::InventoryLevel;

use crate::store::StoreError;

/// Storage of on-hand quantities, keyed by SKU.
#[async_trait]
pub trait InventoryLevelStore: Send + Sync {
    async fn upsert(&self, level: &InventoryLevel) -> Result<(), StoreError>;

    async fn get(&self, sku_code: &SkuCode) -> Result<Option<InventoryLevel>, StoreError>;

    /// Fetch the levels known for `sku_codes`; unknown SKUs are simply absent
    /// from the result.
    async fn get_many(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<Vec<InventoryLevel>, StoreError>;
}

#[async_trait]
impl<T> InventoryLevelStore for std::sync::Arc<T>
where
    T: InventoryLevelStore + ?Sized,
{
    async fn upsert(&self, level: &InventoryLevel) -> Result<(), StoreError> {
        (**self).upsert(level).await
    }

    async fn get(&self, sku_code: &SkuCode) -> Result<Option<InventoryLevel>, StoreError> {
        (**self).get(sku_code).await
    }

    async fn get_many(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<Vec<InventoryLevel>, StoreError> {
        (**self).get_many(sku_codes).await
    }
}

/// In-memory level store for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    levels: Mutex<HashMap<SkuCode, i64>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryLevelStore for InMemoryInventoryStore {
    async fn upsert(&self, level: &InventoryLevel) -> Result<(), StoreError> {
        self.levels
            .lock()
            .unwrap()
            .insert(level.sku_code.clone(), level.quantity);
        Ok(())
    }

    async fn get(&self, sku_code: &SkuCode) -> Result<Option<InventoryLevel>, StoreError> {
        Ok(self
            .levels
            .lock()
            .unwrap()
            .get(sku_code)
            .map(|qty| InventoryLevel::new(sku_code.clone(), *qty)))
    }

    async fn get_many(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<Vec<InventoryLevel>, StoreError> {
        let levels = self.levels.lock().unwrap();
        Ok(sku_codes
            .iter()
            .filter_map(|sku| {
                levels
                    .get(sku)
                    .map(|qty| InventoryLevel::new(sku.clone(), *qty))
            })
            .collect())
    }
}

/// Postgres-backed level store (`inventory_levels` table).
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryLevelStore for PostgresInventoryStore {
    async fn upsert(&self, level: &InventoryLevel) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_levels (sku_code, quantity)
            VALUES ($1, $2)
            ON CONFLICT (sku_code)
            DO UPDATE SET
                quantity = EXCLUDED.quantity,
                updated_at = NOW()
            "#,
        )
        .bind(level.sku_code.as_str())
        .bind(level.quantity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, sku_code: &SkuCode) -> Result<Option<InventoryLevel>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT sku_code, quantity
            FROM inventory_levels
            WHERE sku_code = $1
            "#,
        )
        .bind(sku_code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(level_from_row).transpose()
    }

    async fn get_many(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<Vec<InventoryLevel>, StoreError> {
        let codes: Vec<String> = sku_codes.iter().map(|s| s.as_str().to_string()).collect();

        let rows = sqlx::query(
            r#"
            SELECT sku_code, quantity
            FROM inventory_levels
            WHERE sku_code = ANY($1)
            "#,
        )
        .bind(&codes)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(level_from_row).collect()
    }
}

fn level_from_row(row: sqlx::postgres::PgRow) -> Result<InventoryLevel, StoreError> {
    let sku_code: String = row.try_get("sku_code")?;
    let quantity: i64 = row.try_get("quantity")?;
    let sku_code = SkuCode::new(sku_code).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(InventoryLevel::new(sku_code, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(code: &str) -> SkuCode {
        SkuCode::new(code).unwrap()
    }

    #[tokio::test]
    async fn upsert_overwrites_previous_quantity() {
        let store = InMemoryInventoryStore::new();
        store
            .upsert(&InventoryLevel::new(sku("a"), 3))
            .await
            .unwrap();
        store
            .upsert(&InventoryLevel::new(sku("a"), 0))
            .await
            .unwrap();

        let level = store.get(&sku("a")).await.unwrap().unwrap();
        assert_eq!(level.quantity, 0);
        assert!(!level.is_in_stock());
    }

    #[tokio::test]
    async fn get_many_returns_only_known_skus() {
        let store = InMemoryInventoryStore::new();
        store
            .upsert(&InventoryLevel::new(sku("a"), 3))
            .await
            .unwrap();

        let request: BTreeSet<SkuCode> = [sku("a"), sku("b")].into_iter().collect();
        let found = store.get_many(&request).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku_code, sku("a"));
    }
}
