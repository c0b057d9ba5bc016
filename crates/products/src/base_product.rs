use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{AggregateId, AggregateRoot, DomainError, DomainResult};

/// Base product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseProductId(pub AggregateId);

impl BaseProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for BaseProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Category reference (categories themselves are managed elsewhere).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub AggregateId);

impl core::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Input for `BaseProduct::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBaseProduct {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Aggregate root: BaseProduct.
///
/// Owns its variants (persistence cascades deletes). Variants reference it by id
/// only; the parent does not hold the child collection in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseProduct {
    id: BaseProductId,
    name: String,
    description: Option<String>,
    category_id: Option<CategoryId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl BaseProduct {
    pub fn create(
        id: BaseProductId,
        input: NewBaseProduct,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            category_id: input.category_id,
            created_at: occurred_at,
            updated_at: occurred_at,
            version: 1,
        })
    }

    pub fn id_typed(&self) -> BaseProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl AggregateRoot for BaseProduct {
    type Id = BaseProductId;

    const AGGREGATE_TYPE: &'static str = "catalog.base_product";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
