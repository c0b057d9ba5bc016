//! Persistence boundary for catalog aggregates.
//!
//! Handlers depend on the traits in `trait.rs` only. The in-memory
//! implementations back tests, local development, and the CLI; real storage
//! adapters live outside this workspace.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{
    InMemoryBaseProductRepository, InMemoryUnitOfMeasureRepository, InMemoryVariantRepository,
};
pub use r#trait::{
    BaseProductRepository, ProductVariantRepository, RepositoryError, UnitOfMeasureRepository,
};
