use serde::{Deserialize, Serialize};

use catalog_core::{AggregateId, DomainError, DomainResult, Entity};

/// Unit of measure identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitOfMeasureId(pub AggregateId);

impl UnitOfMeasureId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for UnitOfMeasureId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Length,
    Weight,
    Volume,
    Count,
}

/// Input for `UnitOfMeasure::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUnitOfMeasure {
    pub name: String,
    pub symbol: String,
    pub kind: UnitKind,
}

/// Reference data: a unit variants are measured in (kilogram, litre, piece).
///
/// Shared by many variants, owned by none. Global name uniqueness is enforced by
/// the command layer against the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    id: UnitOfMeasureId,
    name: String,
    symbol: String,
    kind: UnitKind,
}

impl UnitOfMeasure {
    pub fn create(id: UnitOfMeasureId, input: NewUnitOfMeasure) -> DomainResult<Self> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("unit name cannot be empty"));
        }
        let symbol = input.symbol.trim();
        if symbol.is_empty() {
            return Err(DomainError::validation("unit symbol cannot be empty"));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            symbol: symbol.to_string(),
            kind: input.kind,
        })
    }

    pub fn id_typed(&self) -> UnitOfMeasureId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }
}

impl Entity for UnitOfMeasure {
    type Id = UnitOfMeasureId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
