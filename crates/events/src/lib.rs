//! Domain events: typed event contract, envelopes, and the publish side.
//!
//! Events are published **after** the owning aggregate has been persisted.
//! Publication is fire-and-forget from the caller's point of view: a failed
//! publish never undoes the mutation that produced the event.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod publisher;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use publisher::{BusEventPublisher, EventPublisher, PublishError};
