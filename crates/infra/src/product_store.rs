//! Catalog storage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use shopkit_core::{ProductId, SkuCode};
use shopkit_products::Product;

use crate::store::StoreError;

/// Catalog row storage.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn save(&self, product: &Product) -> Result<(), StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn list(&self) -> Result<Vec<Product>, StoreError>;
}

#[async_trait]
impl<T> ProductStore for std::sync::Arc<T>
where
    T: ProductStore + ?Sized,
{
    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        (**self).save(product).await
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }
}

/// In-memory catalog for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: Mutex<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id(), product.clone());
        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> =
            self.products.lock().unwrap().values().cloned().collect();
        products.sort_by_key(|p| (p.created_at(), p.id().to_string()));
        Ok(products)
    }
}

/// Postgres-backed catalog (`products` table).
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, sku_code, name, description, price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.sku_code().as_str())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price() as i64)
        .bind(product.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, sku_code, name, description, price, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(product_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sku_code, name, description, price, created_at
            FROM products
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(product_from_row).collect()
    }
}

fn product_from_row(row: sqlx::postgres::PgRow) -> Result<Product, StoreError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let sku_code: String = row.try_get("sku_code")?;
    let name: String = row.try_get("name")?;
    let description: Option<String> = row.try_get("description")?;
    let price: i64 = row.try_get("price")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    let sku_code = SkuCode::new(sku_code).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Product::new(
        ProductId::from_uuid(id),
        sku_code,
        name,
        description,
        price as u64,
        created_at,
    )
    .map_err(|e| StoreError::Corrupt(e.to_string()))
}
