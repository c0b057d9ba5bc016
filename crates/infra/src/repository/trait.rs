use async_trait::async_trait;
use thiserror::Error;

use catalog_products::{
    BaseProduct, BaseProductId, ProductVariant, ProductVariantId, UnitOfMeasure, UnitOfMeasureId,
};

/// Repository operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors. Business-level absence is expressed as `Ok(None)` by the
/// lookups; `Missing` is only for writes against a record that is gone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Duplicate(String),

    #[error("record missing: {0}")]
    Missing(String),

    #[error("stale write rejected: {0}")]
    Concurrency(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Persistence port for product variants.
///
/// ## Name lookups
///
/// Variant names are unique per base product only, so `get_by_name` returns
/// every variant carrying that exact name across the whole catalog. Callers
/// decide which of them are in scope.
///
/// ## Writes
///
/// `update` is a conditional write: implementations must reject a snapshot whose
/// version is not newer than the stored one (`RepositoryError::Concurrency`).
#[async_trait]
pub trait ProductVariantRepository: Send + Sync {
    async fn get_by_id(&self, id: ProductVariantId) -> Result<Option<ProductVariant>, RepositoryError>;

    async fn get_by_name(&self, name: &str) -> Result<Vec<ProductVariant>, RepositoryError>;

    async fn add(&self, variant: &ProductVariant) -> Result<(), RepositoryError>;

    async fn update(&self, variant: &ProductVariant) -> Result<(), RepositoryError>;

    async fn delete(&self, variant: &ProductVariant) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<ProductVariant>, RepositoryError>;
}

/// Persistence port for base products.
#[async_trait]
pub trait BaseProductRepository: Send + Sync {
    async fn get_by_id(&self, id: BaseProductId) -> Result<Option<BaseProduct>, RepositoryError>;

    /// Base product names are globally unique, so at most one match.
    async fn get_by_name(&self, name: &str) -> Result<Option<BaseProduct>, RepositoryError>;

    async fn add(&self, product: &BaseProduct) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<BaseProduct>, RepositoryError>;
}

/// Persistence port for units of measure.
#[async_trait]
pub trait UnitOfMeasureRepository: Send + Sync {
    async fn get_by_id(&self, id: UnitOfMeasureId) -> Result<Option<UnitOfMeasure>, RepositoryError>;

    /// Unit names are globally unique, so at most one match.
    async fn get_by_name(&self, name: &str) -> Result<Option<UnitOfMeasure>, RepositoryError>;

    async fn add(&self, unit: &UnitOfMeasure) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<UnitOfMeasure>, RepositoryError>;
}
