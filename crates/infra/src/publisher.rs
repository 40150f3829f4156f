//! Bridges the coordinator's publisher port onto the event bus.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use shopkit_events::{EventBus, EventEnvelope, InMemoryEventBus};
use shopkit_orders::{EventPublisher, OrderPlacedEvent, PublishError};

/// The bus type carrying order placement envelopes.
pub type OrderEventBus = InMemoryEventBus<EventEnvelope<OrderPlacedEvent>>;

/// Publishes placement events onto the in-process channel.
///
/// Wraps each event in an [`EventEnvelope`] on [`OrderPlacedEvent::TOPIC`];
/// subscribers (SSE stream, notification worker) fan out from the bus.
pub struct ChannelEventPublisher {
    bus: Arc<OrderEventBus>,
}

impl ChannelEventPublisher {
    pub fn new(bus: Arc<OrderEventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: &OrderPlacedEvent) -> Result<(), PublishError> {
        let envelope =
            EventEnvelope::new(Uuid::now_v7(), OrderPlacedEvent::TOPIC, event.clone());

        self.bus
            .publish(envelope)
            .map_err(|e| PublishError(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use shopkit_core::OrderId;

    #[tokio::test]
    async fn published_events_reach_subscribers_enveloped() {
        let bus: Arc<OrderEventBus> = Arc::new(InMemoryEventBus::new());
        let subscription = bus.subscribe();
        let publisher = ChannelEventPublisher::new(bus);

        let event = OrderPlacedEvent::new(OrderId::new(), Utc::now());
        publisher.publish(&event).await.unwrap();

        let envelope = subscription
            .recv_timeout(Duration::from_secs(1))
            .unwrap();
        assert_eq!(envelope.topic(), OrderPlacedEvent::TOPIC);
        assert_eq!(envelope.payload().order_id, event.order_id);
    }
}
