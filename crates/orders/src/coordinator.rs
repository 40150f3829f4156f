//! Order placement coordination.
//!
//! `place_order` is one strictly ordered unit of work:
//! validate → batched stock lookup (spanned, bounded) → persist → publish.
//! Rejections and infrastructure faults never leave partial state behind;
//! the only tolerated inconsistency is a publish failure *after* the order
//! is durable, which is logged for reconciliation instead of being rolled
//! back (the admission decision already succeeded).

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use shopkit_core::{OrderId, SkuCode};
use shopkit_observability::SpanScope;

use crate::event::OrderPlacedEvent;
use crate::order::{LineItemRequest, Order, OrderLineItem};

/// The inventory authority could not be reached (transport failure, timeout).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("inventory authority unavailable: {0}")]
pub struct UnavailableError(pub String);

/// Order persistence failed (or an append-only invariant was violated).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

/// Event publication failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("publish error: {0}")]
pub struct PublishError(pub String);

/// Queries a remote inventory authority for a batch of SKUs.
///
/// The answer maps each SKU to its in-stock flag. Implementations must not
/// conflate transport failure with "out of stock"; that distinction is the
/// caller's whole error model.
#[async_trait]
pub trait StockChecker: Send + Sync {
    async fn check_stock(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<HashMap<SkuCode, bool>, UnavailableError>;
}

/// Durable, append-only persistence of admitted orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn save(&self, order: &Order) -> Result<OrderId, StorageError>;

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError>;
}

/// At-least-once fan-out of placement events to downstream subscribers.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &OrderPlacedEvent) -> Result<(), PublishError>;
}

#[async_trait]
impl<T> StockChecker for Arc<T>
where
    T: StockChecker + ?Sized,
{
    async fn check_stock(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<HashMap<SkuCode, bool>, UnavailableError> {
        (**self).check_stock(sku_codes).await
    }
}

#[async_trait]
impl<T> OrderStore for Arc<T>
where
    T: OrderStore + ?Sized,
{
    async fn save(&self, order: &Order) -> Result<OrderId, StorageError> {
        (**self).save(order).await
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        (**self).get(id).await
    }
}

#[async_trait]
impl<T> EventPublisher for Arc<T>
where
    T: EventPublisher + ?Sized,
{
    async fn publish(&self, event: &OrderPlacedEvent) -> Result<(), PublishError> {
        (**self).publish(event).await
    }
}

/// Why a placement request failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaceOrderError {
    /// Caller error; nothing was attempted downstream.
    #[error("invalid order request: {0}")]
    InvalidRequest(String),

    /// Business rejection: at least one SKU is not in stock. Retriable by
    /// the caller after restocking; no side effects occurred.
    #[error("not in stock: [{}]", .sku_codes.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "))]
    OutOfStock { sku_codes: Vec<SkuCode> },

    /// Transient infrastructure failure reaching the inventory authority;
    /// no side effects, the whole request is safe to retry.
    #[error("inventory authority unreachable: {0}")]
    InventoryUnreachable(String),

    /// Persistence failed; the order was not placed and is safe to retry.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Successful placement outcome handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
}

/// Coordinates the admission decision for incoming orders.
///
/// Each `place_order` call is an independent unit of work; the coordinator
/// holds no mutable state of its own, so concurrent placements only contend
/// inside the store and publisher.
pub struct OrderPlacementCoordinator<C, S, P> {
    stock_checker: C,
    order_store: S,
    event_publisher: P,
    stock_check_timeout: Duration,
}

impl<C, S, P> OrderPlacementCoordinator<C, S, P>
where
    C: StockChecker,
    S: OrderStore,
    P: EventPublisher,
{
    pub fn new(
        stock_checker: C,
        order_store: S,
        event_publisher: P,
        stock_check_timeout: Duration,
    ) -> Self {
        Self {
            stock_checker,
            order_store,
            event_publisher,
            stock_check_timeout,
        }
    }

    /// Decide whether `line_items` can be admitted as an order.
    ///
    /// Admits iff the inventory authority reports every distinct SKU in
    /// stock; a SKU absent from the answer counts as not in stock
    /// (fail-closed). On admission the order is persisted first, then the
    /// placement event is published.
    pub async fn place_order(
        &self,
        line_items: Vec<LineItemRequest>,
    ) -> Result<OrderConfirmation, PlaceOrderError> {
        if line_items.is_empty() {
            return Err(PlaceOrderError::InvalidRequest(
                "order must contain at least one line item".to_string(),
            ));
        }

        let line_items = line_items
            .into_iter()
            .map(OrderLineItem::from_request)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PlaceOrderError::InvalidRequest(e.to_string()))?;

        let order = Order::new(OrderId::new(), line_items, Utc::now())
            .map_err(|e| PlaceOrderError::InvalidRequest(e.to_string()))?;

        let sku_codes = order.distinct_skus();
        tracing::info!(
            order_id = %order.id(),
            distinct_skus = sku_codes.len(),
            "checking stock with inventory authority"
        );

        let stock = self.lookup_stock(&sku_codes).await?;

        let out_of_stock: Vec<SkuCode> = sku_codes
            .iter()
            .filter(|sku| !stock.get(*sku).copied().unwrap_or(false))
            .cloned()
            .collect();

        if !out_of_stock.is_empty() {
            tracing::info!(
                order_id = %order.id(),
                rejected_skus = out_of_stock.len(),
                "order rejected: not all SKUs in stock"
            );
            return Err(PlaceOrderError::OutOfStock {
                sku_codes: out_of_stock,
            });
        }

        // Persist before publishing: never advertise an order that is not
        // durable yet.
        let order_id = self.order_store.save(&order).await?;

        let event = OrderPlacedEvent::new(order_id, Utc::now());
        if let Err(e) = self.event_publisher.publish(&event).await {
            // The order IS placed; a lost event is a recoverable
            // inconsistency, reconciled from the store, not a failure of
            // the admission decision.
            tracing::error!(
                order_id = %order_id,
                error = %e,
                "order placed but event publication failed; needs reconciliation"
            );
        }

        Ok(OrderConfirmation { order_id })
    }

    /// Run the remote stock check inside a named span with a bounded wait.
    ///
    /// The span closes on every exit path; cancellation of the surrounding
    /// request drops the in-flight call along with this future.
    async fn lookup_stock(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<HashMap<SkuCode, bool>, PlaceOrderError> {
        let check = tokio::time::timeout(
            self.stock_check_timeout,
            self.stock_checker.check_stock(sku_codes),
        );

        match SpanScope::run("inventory-service-lookup", check).await {
            Ok(Ok(stock)) => Ok(stock),
            Ok(Err(e)) => Err(PlaceOrderError::InventoryUnreachable(e.to_string())),
            Err(_) => Err(PlaceOrderError::InventoryUnreachable(format!(
                "stock check timed out after {}ms",
                self.stock_check_timeout.as_millis()
            ))),
        }
    }
}
