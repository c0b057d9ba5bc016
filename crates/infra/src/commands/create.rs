use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use catalog_core::{AggregateId, AggregateRoot};
use catalog_products::{
    BaseProductId, DynamicProperties, NewVariant, PhotoRef, ProductVariant, ProductVariantId,
    UnitOfMeasureId, VariantCreated, VariantEvent,
};

use super::{CatalogService, CommandContext, MutationError, VariantDto};

/// Create a variant under an existing base product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariant {
    /// Client-chosen id (imports, fixtures). A fresh id is assigned when absent.
    #[serde(default)]
    pub variant_id: Option<ProductVariantId>,
    pub base_product_id: BaseProductId,
    pub name: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    pub unit_of_measure_id: UnitOfMeasureId,
    pub unit_value: Decimal,
    #[serde(default)]
    pub usage_notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    #[serde(default)]
    pub dynamic_properties: DynamicProperties,
}

impl CatalogService {
    /// Base product must exist, then the unit, then the name must be free
    /// within the base product. Only then is the variant built and stored.
    pub async fn create_variant(
        &self,
        ctx: &CommandContext,
        cmd: CreateVariant,
        cancel: &CancellationToken,
    ) -> Result<VariantDto, MutationError> {
        let base_product = self.load_base_product(cmd.base_product_id).await?;
        let unit = self.load_unit(cmd.unit_of_measure_id).await?;
        self.ensure_variant_name_free(base_product.id_typed(), &cmd.name, None)
            .await?;

        let id = cmd
            .variant_id
            .unwrap_or_else(|| ProductVariantId::new(AggregateId::new()));
        if self.variants.get_by_id(id).await?.is_some() {
            return Err(MutationError::InvalidOperation(format!(
                "variant id {id} is already in use"
            )));
        }

        let variant = ProductVariant::create(
            id,
            NewVariant {
                base_product_id: cmd.base_product_id,
                name: cmd.name,
                stock_quantity: cmd.stock_quantity,
                unit_of_measure_id: cmd.unit_of_measure_id,
                unit_value: cmd.unit_value,
                usage_notes: cmd.usage_notes,
                photos: cmd.photos,
                dynamic_properties: cmd.dynamic_properties,
            },
            ctx.occurred_at,
        )?;

        Self::ensure_not_cancelled(cancel)?;
        self.variants.add(&variant).await?;

        tracing::info!(
            variant_id = %variant.id_typed(),
            base_product_id = %variant.base_product_id(),
            actor = %ctx.actor,
            "variant created"
        );

        self.publish(
            ctx,
            variant.id_typed().0,
            variant.version(),
            VariantEvent::VariantCreated(VariantCreated {
                variant: variant.clone(),
                occurred_at: ctx.occurred_at,
            }),
        )
        .await;

        Ok(VariantDto::project(&variant, &base_product, Some(&unit)))
    }
}
