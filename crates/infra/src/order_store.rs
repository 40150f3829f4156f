//! Append-only persistence of admitted orders.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use shopkit_core::{OrderId, SkuCode};
use shopkit_orders::{Order, OrderLineItem, OrderStore, StorageError};

/// In-memory order store for dev/test. Append-only: saving an id twice is an
/// error, matching the durable store's unique constraint.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save(&self, order: &Order) -> Result<OrderId, StorageError> {
        let mut orders = self.orders.lock().unwrap();
        if orders.contains_key(&order.id()) {
            return Err(StorageError(format!(
                "order {} already stored (append-only)",
                order.id()
            )));
        }
        orders.insert(order.id(), order.clone());
        Ok(order.id())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }
}

/// Postgres-backed order store.
///
/// One transaction inserts the order row and its line items; there is no
/// UPDATE path anywhere, the tables only ever grow.
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn save(&self, order: &Order) -> Result<OrderId, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, placed_at)
            VALUES ($1, $2)
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.placed_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError(e.to_string()))?;

        for (line_no, line) in order.line_items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_line_items (order_id, line_no, sku_code, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id().as_uuid())
            .bind((line_no as i32) + 1)
            .bind(line.sku_code().as_str())
            .bind(line.unit_price() as i64)
            .bind(line.quantity() as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError(e.to_string()))?;
        }

        tx.commit().await.map_err(|e| StorageError(e.to_string()))?;

        Ok(order.id())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        let order_row = sqlx::query(
            r#"
            SELECT id, placed_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError(e.to_string()))?;

        let Some(order_row) = order_row else {
            return Ok(None);
        };

        let placed_at: DateTime<Utc> = order_row
            .try_get("placed_at")
            .map_err(|e| StorageError(e.to_string()))?;

        let line_rows = sqlx::query(
            r#"
            SELECT sku_code, unit_price, quantity
            FROM order_line_items
            WHERE order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError(e.to_string()))?;

        let mut line_items = Vec::with_capacity(line_rows.len());
        for row in line_rows {
            let sku_code: String = row
                .try_get("sku_code")
                .map_err(|e| StorageError(e.to_string()))?;
            let unit_price: i64 = row
                .try_get("unit_price")
                .map_err(|e| StorageError(e.to_string()))?;
            let quantity: i32 = row
                .try_get("quantity")
                .map_err(|e| StorageError(e.to_string()))?;

            let sku_code = SkuCode::new(sku_code)
                .map_err(|e| StorageError(format!("corrupt line item: {e}")))?;
            let line = OrderLineItem::new(sku_code, unit_price as u64, quantity as u32)
                .map_err(|e| StorageError(format!("corrupt line item: {e}")))?;
            line_items.push(line);
        }

        let order = Order::new(id, line_items, placed_at)
            .map_err(|e| StorageError(format!("corrupt order: {e}")))?;

        Ok(Some(order))
    }
}
