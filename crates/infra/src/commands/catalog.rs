//! Reference data commands: base products and units of measure.
//!
//! Both have globally unique names, checked against the repository before the
//! record is stored. Neither publishes variant events.

use serde::{Deserialize, Serialize};

use catalog_core::AggregateId;
use catalog_products::{
    BaseProduct, BaseProductId, CategoryId, NewBaseProduct, NewUnitOfMeasure, UnitKind,
    UnitOfMeasure, UnitOfMeasureId,
};

use super::{CatalogService, CommandContext, EntityKind, MutationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBaseProduct {
    #[serde(default)]
    pub id: Option<BaseProductId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitOfMeasure {
    #[serde(default)]
    pub id: Option<UnitOfMeasureId>,
    pub name: String,
    pub symbol: String,
    pub kind: UnitKind,
}

impl CatalogService {
    pub async fn create_base_product(
        &self,
        ctx: &CommandContext,
        cmd: CreateBaseProduct,
    ) -> Result<BaseProduct, MutationError> {
        let id = cmd
            .id
            .unwrap_or_else(|| BaseProductId::new(AggregateId::new()));
        let product = BaseProduct::create(
            id,
            NewBaseProduct {
                name: cmd.name,
                description: cmd.description,
                category_id: cmd.category_id,
            },
            ctx.occurred_at,
        )?;

        if self.base_products.get_by_name(product.name()).await?.is_some() {
            return Err(MutationError::AlreadyExists {
                entity: EntityKind::BaseProduct,
                name: product.name().to_string(),
                base_product_id: None,
            });
        }
        if self.base_products.get_by_id(id).await?.is_some() {
            return Err(MutationError::InvalidOperation(format!(
                "base product id {id} is already in use"
            )));
        }

        self.base_products.add(&product).await?;
        tracing::info!(base_product_id = %id, actor = %ctx.actor, "base product created");

        Ok(product)
    }

    pub async fn create_unit_of_measure(
        &self,
        ctx: &CommandContext,
        cmd: CreateUnitOfMeasure,
    ) -> Result<UnitOfMeasure, MutationError> {
        let id = cmd
            .id
            .unwrap_or_else(|| UnitOfMeasureId::new(AggregateId::new()));
        let unit = UnitOfMeasure::create(
            id,
            NewUnitOfMeasure {
                name: cmd.name,
                symbol: cmd.symbol,
                kind: cmd.kind,
            },
        )?;

        if self.units.get_by_name(unit.name()).await?.is_some() {
            return Err(MutationError::AlreadyExists {
                entity: EntityKind::UnitOfMeasure,
                name: unit.name().to_string(),
                base_product_id: None,
            });
        }
        if self.units.get_by_id(id).await?.is_some() {
            return Err(MutationError::InvalidOperation(format!(
                "unit of measure id {id} is already in use"
            )));
        }

        self.units.add(&unit).await?;
        tracing::info!(unit_of_measure_id = %id, actor = %ctx.actor, "unit of measure created");

        Ok(unit)
    }
}
