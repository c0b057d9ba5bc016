use chrono::{DateTime, Utc};

/// Something that happened to a catalog aggregate.
///
/// Only emitted once the change it records has been persisted. Payload shape
/// is tied to `version()`; bump it when fields change meaning.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name consumers route on, e.g. `catalog.variant.updated`.
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Business time of the change, taken from the command context.
    fn occurred_at(&self) -> DateTime<Utc>;
}
