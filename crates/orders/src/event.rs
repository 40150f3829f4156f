use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkit_core::OrderId;
use shopkit_events::Event;

/// Event: an order was admitted and durably stored.
///
/// Emitted exactly once per admitted order, after persistence, on the
/// [`OrderPlacedEvent::TOPIC`] channel. Consumers (notification systems and
/// the like) get no synchronous reply path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

impl OrderPlacedEvent {
    /// Logical channel order placement events are published on.
    pub const TOPIC: &'static str = "orders.placed";

    pub fn new(order_id: OrderId, occurred_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            occurred_at,
        }
    }
}

impl Event for OrderPlacedEvent {
    fn event_type(&self) -> &'static str {
        "orders.order.placed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
