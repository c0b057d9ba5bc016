//! `catalog-core`: domain foundation building blocks.
//!
//! Identifiers, the domain error model, and the aggregate/entity/value-object
//! traits shared by the catalog crates. No IO, no async.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::AggregateRoot;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, UserId};
pub use value_object::ValueObject;
