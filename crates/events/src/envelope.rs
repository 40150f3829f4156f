use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for an event published on a logical channel.
///
/// This is the unit handed to the bus: downstream consumers key dedup on
/// `event_id` (delivery is at-least-once) and route on `topic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    /// Named logical channel (e.g. "orders.placed").
    topic: String,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, topic: impl Into<String>, payload: E) -> Self {
        Self {
            event_id,
            topic: topic.into(),
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
