//! Catalog domain module.
//!
//! Base products, their variants, and the units of measure variants are sold
//! in. Business rules are implemented as deterministic domain logic (no IO, no
//! HTTP, no storage); rules that span aggregates take the sibling state as an
//! argument instead of loading it.

pub mod base_product;
pub mod dynamic;
pub mod unit;
pub mod variant;

pub use base_product::{BaseProduct, BaseProductId, CategoryId, NewBaseProduct};
pub use dynamic::{DynamicProperties, DynamicValue};
pub use unit::{NewUnitOfMeasure, UnitKind, UnitOfMeasure, UnitOfMeasureId};
pub use variant::{
    NewVariant, PhotoRef, ProductVariant, ProductVariantId, VariantCreated, VariantDeleted,
    VariantEvent, VariantPatch, VariantUpdated,
};
