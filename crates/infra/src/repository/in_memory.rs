use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use async_trait::async_trait;

use catalog_core::AggregateRoot;
use catalog_products::{
    BaseProduct, BaseProductId, ProductVariant, ProductVariantId, UnitOfMeasure, UnitOfMeasureId,
};

use super::r#trait::{
    BaseProductRepository, ProductVariantRepository, RepositoryError, UnitOfMeasureRepository,
};

/// Keyed snapshot table shared by the in-memory repositories.
#[derive(Debug)]
struct Table<K, V> {
    rows: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Copy + Eq + Hash + Ord + core::fmt::Display,
    V: Clone,
{
    fn get(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(key).cloned())
    }

    fn find(&self, pred: impl Fn(&V) -> bool) -> Result<Vec<V>, RepositoryError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut matches: Vec<(K, V)> = rows
            .iter()
            .filter(|(_, v)| pred(v))
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        matches.sort_by_key(|(k, _)| *k);
        Ok(matches.into_iter().map(|(_, v)| v).collect())
    }

    fn insert_new(&self, key: K, value: V) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        if rows.contains_key(&key) {
            return Err(RepositoryError::Duplicate(key.to_string()));
        }
        rows.insert(key, value);
        Ok(())
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

/// In-memory variant repository.
///
/// Intended for tests/dev and the CLI. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryVariantRepository {
    table: Table<ProductVariantId, ProductVariant>,
}

impl InMemoryVariantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductVariantRepository for InMemoryVariantRepository {
    async fn get_by_id(&self, id: ProductVariantId) -> Result<Option<ProductVariant>, RepositoryError> {
        self.table.get(&id)
    }

    async fn get_by_name(&self, name: &str) -> Result<Vec<ProductVariant>, RepositoryError> {
        self.table.find(|v| v.name() == name)
    }

    async fn add(&self, variant: &ProductVariant) -> Result<(), RepositoryError> {
        self.table.insert_new(variant.id_typed(), variant.clone())
    }

    async fn update(&self, variant: &ProductVariant) -> Result<(), RepositoryError> {
        let mut rows = self.table.rows.write().map_err(|_| poisoned())?;
        let stored = rows
            .get_mut(&variant.id_typed())
            .ok_or_else(|| RepositoryError::Missing(variant.id_typed().to_string()))?;

        if variant.version() <= stored.version() {
            return Err(RepositoryError::Concurrency(format!(
                "variant {} is at version {}, attempted write of version {}",
                variant.id_typed(),
                stored.version(),
                variant.version()
            )));
        }
        if variant.base_product_id() != stored.base_product_id() {
            return Err(RepositoryError::Storage(format!(
                "variant {} cannot move to another base product",
                variant.id_typed()
            )));
        }

        *stored = variant.clone();
        Ok(())
    }

    async fn delete(&self, variant: &ProductVariant) -> Result<(), RepositoryError> {
        let mut rows = self.table.rows.write().map_err(|_| poisoned())?;
        rows.remove(&variant.id_typed())
            .map(|_| ())
            .ok_or_else(|| RepositoryError::Missing(variant.id_typed().to_string()))
    }

    async fn list(&self) -> Result<Vec<ProductVariant>, RepositoryError> {
        self.table.find(|_| true)
    }
}

/// In-memory base product repository.
#[derive(Debug, Default)]
pub struct InMemoryBaseProductRepository {
    table: Table<BaseProductId, BaseProduct>,
}

impl InMemoryBaseProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseProductRepository for InMemoryBaseProductRepository {
    async fn get_by_id(&self, id: BaseProductId) -> Result<Option<BaseProduct>, RepositoryError> {
        self.table.get(&id)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<BaseProduct>, RepositoryError> {
        Ok(self.table.find(|p| p.name() == name)?.into_iter().next())
    }

    async fn add(&self, product: &BaseProduct) -> Result<(), RepositoryError> {
        self.table.insert_new(product.id_typed(), product.clone())
    }

    async fn list(&self) -> Result<Vec<BaseProduct>, RepositoryError> {
        self.table.find(|_| true)
    }
}

/// In-memory unit of measure repository.
#[derive(Debug, Default)]
pub struct InMemoryUnitOfMeasureRepository {
    table: Table<UnitOfMeasureId, UnitOfMeasure>,
}

impl InMemoryUnitOfMeasureRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfMeasureRepository for InMemoryUnitOfMeasureRepository {
    async fn get_by_id(&self, id: UnitOfMeasureId) -> Result<Option<UnitOfMeasure>, RepositoryError> {
        self.table.get(&id)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<UnitOfMeasure>, RepositoryError> {
        Ok(self.table.find(|u| u.name() == name)?.into_iter().next())
    }

    async fn add(&self, unit: &UnitOfMeasure) -> Result<(), RepositoryError> {
        self.table.insert_new(unit.id_typed(), unit.clone())
    }

    async fn list(&self) -> Result<Vec<UnitOfMeasure>, RepositoryError> {
        self.table.find(|_| true)
    }
}
