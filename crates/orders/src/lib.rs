//! `shopkit-orders` — order placement domain.
//!
//! The placement coordinator is the one piece of this system with real
//! decision logic: it admits an order only when the inventory authority
//! reports every referenced SKU in stock, persisting the order and emitting
//! an `orders.order.placed` event on admission.

pub mod coordinator;
pub mod event;
pub mod order;

pub use coordinator::{
    EventPublisher, OrderConfirmation, OrderPlacementCoordinator, OrderStore, PlaceOrderError,
    PublishError, StockChecker, StorageError, UnavailableError,
};
pub use event::OrderPlacedEvent;
pub use order::{LineItemRequest, Order, OrderLineItem};
