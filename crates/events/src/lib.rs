//! `shopkit-events` — domain event mechanics.
//!
//! Transport-agnostic pub/sub: the [`Event`] trait, the [`EventEnvelope`]
//! published on a named topic, the [`EventBus`] contract, and an in-memory
//! bus for dev/test wiring.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
