//! Event publisher port.
//!
//! Handlers depend on `EventPublisher` only. Where the envelopes end up (an
//! in-process bus, a broker, an outbox table) is an infrastructure choice.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{EventBus, EventEnvelope};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("event serialization failed: {0}")]
    Serialize(String),

    #[error("publish cancelled")]
    Cancelled,

    #[error("event transport failed: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for PublishError {
    fn from(value: serde_json::Error) -> Self {
        PublishError::Serialize(value.to_string())
    }
}

/// Fire-and-forget sink for domain events.
///
/// Failures are reported to the caller so they can be logged, but callers must
/// not treat them as a reason to undo the mutation that was already persisted.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        envelope: EventEnvelope<JsonValue>,
        cancel: &CancellationToken,
    ) -> Result<(), PublishError>;
}

/// Publishes envelopes onto an `EventBus`.
#[derive(Debug)]
pub struct BusEventPublisher<B> {
    bus: B,
}

impl<B> BusEventPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

#[async_trait]
impl<B> EventPublisher for BusEventPublisher<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    async fn publish(
        &self,
        envelope: EventEnvelope<JsonValue>,
        cancel: &CancellationToken,
    ) -> Result<(), PublishError> {
        if cancel.is_cancelled() {
            return Err(PublishError::Cancelled);
        }

        tracing::debug!(
            event_type = envelope.event_type(),
            aggregate_id = %envelope.aggregate_id(),
            sequence = envelope.sequence_number(),
            "publishing domain event"
        );

        self.bus
            .publish(envelope)
            .map_err(|e| PublishError::Transport(e.to_string()))
    }
}
