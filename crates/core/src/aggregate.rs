//! Aggregate root trait for state-based domain models.

/// Aggregate root marker + minimal interface.
///
/// Catalog aggregates are persisted as whole snapshots. Mutation methods live on
/// the concrete types and return the next validated state, so this trait only
/// exposes what infrastructure needs to address and sequence them.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Stable aggregate type name (e.g. "catalog.variant").
    const AGGREGATE_TYPE: &'static str;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Starts at 1 on creation and grows by one per accepted mutation.
    fn version(&self) -> u64;
}
