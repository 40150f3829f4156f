use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use shopkit_core::{OrderId, ProductId, SkuCode};
use shopkit_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use shopkit_infra::{
    AppConfig, ChannelEventPublisher, HttpInventoryClient, InMemoryInventoryStore,
    InMemoryOrderStore, InMemoryProductStore, InventoryLevelStore, LocalStockChecker,
    OrderEventBus, PostgresInventoryStore, PostgresOrderStore, PostgresProductStore,
    ProductStore, StoreError,
};
use shopkit_inventory::{InventoryLevel, StockStatus};
use shopkit_orders::{
    LineItemRequest, Order, OrderConfirmation, OrderPlacedEvent, OrderPlacementCoordinator,
    OrderStore, PlaceOrderError, StorageError,
};
use shopkit_products::Product;

// Coordinator wirings: local stock answers in dev/test, remote authority in
// the persistent deployment.
type InMemoryCoordinator = OrderPlacementCoordinator<
    LocalStockChecker<Arc<InMemoryInventoryStore>>,
    Arc<InMemoryOrderStore>,
    ChannelEventPublisher,
>;

type RemoteCoordinator = OrderPlacementCoordinator<
    HttpInventoryClient,
    Arc<PostgresOrderStore>,
    ChannelEventPublisher,
>;

pub enum AppServices {
    InMemory {
        products: Arc<InMemoryProductStore>,
        inventory: Arc<InMemoryInventoryStore>,
        orders: Arc<InMemoryOrderStore>,
        coordinator: InMemoryCoordinator,
        bus: Arc<OrderEventBus>,
    },
    Persistent {
        products: Arc<PostgresProductStore>,
        inventory: Arc<PostgresInventoryStore>,
        orders: Arc<PostgresOrderStore>,
        coordinator: RemoteCoordinator,
        bus: Arc<OrderEventBus>,
    },
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        build_persistent_services(config).await
    } else {
        Ok(build_in_memory_services(config))
    }
}

fn build_in_memory_services(config: &AppConfig) -> AppServices {
    let products = Arc::new(InMemoryProductStore::new());
    let inventory = Arc::new(InMemoryInventoryStore::new());
    let orders = Arc::new(InMemoryOrderStore::new());

    let bus: Arc<OrderEventBus> = Arc::new(InMemoryEventBus::new());
    spawn_notification_worker(bus.clone());

    let coordinator = OrderPlacementCoordinator::new(
        LocalStockChecker::new(inventory.clone()),
        orders.clone(),
        ChannelEventPublisher::new(bus.clone()),
        config.stock_check_timeout,
    );

    AppServices::InMemory {
        products,
        inventory,
        orders,
        coordinator,
        bus,
    }
}

async fn build_persistent_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;

    let products = Arc::new(PostgresProductStore::new(pool.clone()));
    let inventory = Arc::new(PostgresInventoryStore::new(pool.clone()));
    let orders = Arc::new(PostgresOrderStore::new(pool));

    let bus: Arc<OrderEventBus> = Arc::new(InMemoryEventBus::new());
    spawn_notification_worker(bus.clone());

    let stock_checker = HttpInventoryClient::new(
        &config.inventory_service_url,
        config.stock_check_timeout,
    )
    .context("failed to build inventory client")?;

    let coordinator = OrderPlacementCoordinator::new(
        stock_checker,
        orders.clone(),
        ChannelEventPublisher::new(bus.clone()),
        config.stock_check_timeout,
    );

    Ok(AppServices::Persistent {
        products,
        inventory,
        orders,
        coordinator,
        bus,
    })
}

/// Background subscriber standing in for the downstream notification
/// consumer: logs every placement event it receives. At-least-once delivery;
/// a duplicate log line is harmless.
fn spawn_notification_worker(bus: Arc<OrderEventBus>) {
    let subscription = bus.subscribe();
    tokio::task::spawn_blocking(move || {
        loop {
            match subscription.recv() {
                Ok(envelope) => {
                    tracing::info!(
                        order_id = %envelope.payload().order_id,
                        event_id = %envelope.event_id(),
                        topic = envelope.topic(),
                        "order placed; dispatching notification"
                    );
                }
                Err(_) => break,
            }
        }
    });
}

impl AppServices {
    pub async fn product_save(&self, product: &Product) -> Result<(), StoreError> {
        match self {
            AppServices::InMemory { products, .. } => products.save(product).await,
            AppServices::Persistent { products, .. } => products.save(product).await,
        }
    }

    pub async fn product_get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        match self {
            AppServices::InMemory { products, .. } => products.get(id).await,
            AppServices::Persistent { products, .. } => products.get(id).await,
        }
    }

    pub async fn product_list(&self) -> Result<Vec<Product>, StoreError> {
        match self {
            AppServices::InMemory { products, .. } => products.list().await,
            AppServices::Persistent { products, .. } => products.list().await,
        }
    }

    pub async fn inventory_upsert(&self, level: &InventoryLevel) -> Result<(), StoreError> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.upsert(level).await,
            AppServices::Persistent { inventory, .. } => inventory.upsert(level).await,
        }
    }

    pub async fn inventory_get(
        &self,
        sku_code: &SkuCode,
    ) -> Result<Option<InventoryLevel>, StoreError> {
        match self {
            AppServices::InMemory { inventory, .. } => inventory.get(sku_code).await,
            AppServices::Persistent { inventory, .. } => inventory.get(sku_code).await,
        }
    }

    /// Answer a stock query for every requested SKU; unknown SKUs answer
    /// `in_stock: false`.
    pub async fn stock_statuses(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<Vec<StockStatus>, StoreError> {
        let known = match self {
            AppServices::InMemory { inventory, .. } => inventory.get_many(sku_codes).await?,
            AppServices::Persistent { inventory, .. } => inventory.get_many(sku_codes).await?,
        };

        let mut statuses: Vec<StockStatus> = Vec::with_capacity(sku_codes.len());
        for sku in sku_codes {
            match known.iter().find(|level| &level.sku_code == sku) {
                Some(level) => statuses.push(level.status()),
                None => statuses.push(StockStatus::unknown(sku.clone())),
            }
        }
        Ok(statuses)
    }

    pub async fn place_order(
        &self,
        line_items: Vec<LineItemRequest>,
    ) -> Result<OrderConfirmation, PlaceOrderError> {
        match self {
            AppServices::InMemory { coordinator, .. } => coordinator.place_order(line_items).await,
            AppServices::Persistent { coordinator, .. } => {
                coordinator.place_order(line_items).await
            }
        }
    }

    pub async fn order_get(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        match self {
            AppServices::InMemory { orders, .. } => orders.get(id).await,
            AppServices::Persistent { orders, .. } => orders.get(id).await,
        }
    }

    pub fn subscribe_order_events(&self) -> Subscription<EventEnvelope<OrderPlacedEvent>> {
        match self {
            AppServices::InMemory { bus, .. } => bus.subscribe(),
            AppServices::Persistent { bus, .. } => bus.subscribe(),
        }
    }
}
