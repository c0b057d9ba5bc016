//! Reference-data records addressed by id.

/// Something other aggregates point at by id but never own, such as a unit
/// of measure. Unlike an `AggregateRoot` it carries no version.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
