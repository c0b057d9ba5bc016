use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog_core::{AggregateId, DomainError};
use catalog_products::BaseProductId;

use crate::repository::RepositoryError;

/// Which kind of catalog record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Variant,
    BaseProduct,
    UnitOfMeasure,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            EntityKind::Variant => "variant",
            EntityKind::BaseProduct => "base product",
            EntityKind::UnitOfMeasure => "unit of measure",
        })
    }
}

/// Coarse, closed classification of a mutation failure.
///
/// This is what callers (and bulk error records) switch on; it never depends on
/// concrete error type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidOperation,
    Unexpected,
    /// The batch was cancelled before this item was attempted.
    Cancelled,
}

/// Failure of a catalog command.
///
/// - `NotFound`: a referenced record is absent (404-equivalent)
/// - `AlreadyExists`: a name uniqueness rule was hit (409-equivalent)
/// - `InvalidOperation`: a domain rule rejected the change (400-equivalent)
/// - `Unexpected`: storage/infrastructure fault
/// - `Cancelled`: the caller cancelled before anything was written
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("{entity} {id} was not found")]
    NotFound { entity: EntityKind, id: AggregateId },

    #[error("{}", describe_duplicate(.entity, .name, .base_product_id))]
    AlreadyExists {
        entity: EntityKind,
        name: String,
        /// Uniqueness scope; `None` for globally unique names.
        base_product_id: Option<BaseProductId>,
    },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("unexpected failure: {0}")]
    Unexpected(String),

    #[error("operation cancelled")]
    Cancelled,
}

fn describe_duplicate(entity: &EntityKind, name: &str, scope: &Option<BaseProductId>) -> String {
    match scope {
        Some(base_product_id) => {
            format!("a {entity} named '{name}' already exists for base product {base_product_id}")
        }
        None => format!("a {entity} named '{name}' already exists"),
    }
}

impl MutationError {
    pub fn not_found(entity: EntityKind, id: AggregateId) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MutationError::NotFound { .. } => ErrorKind::NotFound,
            MutationError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            MutationError::InvalidOperation(_) => ErrorKind::InvalidOperation,
            MutationError::Unexpected(_) => ErrorKind::Unexpected,
            MutationError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<DomainError> for MutationError {
    fn from(value: DomainError) -> Self {
        // Aggregates only ever report rule violations; missing records are
        // detected (with their ids) by the handlers themselves.
        MutationError::InvalidOperation(value.to_string())
    }
}

impl From<RepositoryError> for MutationError {
    fn from(value: RepositoryError) -> Self {
        MutationError::Unexpected(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_every_variant() {
        let id = AggregateId::new();
        assert_eq!(MutationError::not_found(EntityKind::Variant, id).kind(), ErrorKind::NotFound);
        assert_eq!(
            MutationError::InvalidOperation("x".into()).kind(),
            ErrorKind::InvalidOperation
        );
        assert_eq!(MutationError::Unexpected("x".into()).kind(), ErrorKind::Unexpected);
        assert_eq!(MutationError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn duplicate_message_names_the_scope() {
        let base = BaseProductId::new(AggregateId::new());
        let scoped = MutationError::AlreadyExists {
            entity: EntityKind::Variant,
            name: "Red".to_string(),
            base_product_id: Some(base),
        };
        let global = MutationError::AlreadyExists {
            entity: EntityKind::UnitOfMeasure,
            name: "Kilogram".to_string(),
            base_product_id: None,
        };

        assert_eq!(
            scoped.to_string(),
            format!("a variant named 'Red' already exists for base product {base}")
        );
        assert_eq!(global.to_string(), "a unit of measure named 'Kilogram' already exists");
    }

    #[test]
    fn error_kind_serializes_as_pascal_case() {
        assert_eq!(serde_json::to_string(&ErrorKind::AlreadyExists).unwrap(), "\"AlreadyExists\"");
    }

    #[test]
    fn repository_failures_are_unexpected() {
        let err: MutationError = RepositoryError::Storage("disk full".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }
}
