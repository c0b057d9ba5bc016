use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use catalog_core::AggregateRoot;
use catalog_products::{
    DynamicProperties, PhotoRef, ProductVariantId, UnitOfMeasureId, VariantEvent, VariantPatch,
    VariantUpdated,
};

use super::{CatalogService, CommandContext, MutationError, VariantDto};

/// Partial update of one variant. Omitted fields keep their current value.
///
/// `dynamic_properties`, when present, replaces the whole map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariant {
    pub variant_id: ProductVariantId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit_of_measure_id: Option<UnitOfMeasureId>,
    #[serde(default)]
    pub unit_value: Option<Decimal>,
    #[serde(default)]
    pub usage_notes: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub photos: Option<Vec<PhotoRef>>,
    #[serde(default)]
    pub dynamic_properties: Option<DynamicProperties>,
}

impl UpdateVariant {
    /// An update that changes nothing but still bumps the version.
    pub fn new(variant_id: ProductVariantId) -> Self {
        Self {
            variant_id,
            name: None,
            unit_of_measure_id: None,
            unit_value: None,
            usage_notes: None,
            stock_quantity: None,
            photos: None,
            dynamic_properties: None,
        }
    }

    fn patch(&self) -> VariantPatch {
        VariantPatch {
            name: self.name.clone(),
            unit_of_measure_id: self.unit_of_measure_id,
            unit_value: self.unit_value,
            usage_notes: self.usage_notes.clone(),
            stock_quantity: self.stock_quantity,
            photos: self.photos.clone(),
            dynamic_properties: self.dynamic_properties.clone(),
        }
    }
}

impl CatalogService {
    pub async fn update_variant(
        &self,
        ctx: &CommandContext,
        cmd: UpdateVariant,
        cancel: &CancellationToken,
    ) -> Result<VariantDto, MutationError> {
        let current = self.load_variant(cmd.variant_id).await?;
        let base_product = self.load_base_product(current.base_product_id()).await?;

        let unit = match cmd.unit_of_measure_id {
            Some(unit_id) if unit_id != current.unit_of_measure_id() => {
                Some(self.load_unit(unit_id).await?)
            }
            // Unchanged unit: only needed for display, so absence is tolerated.
            _ => self.units.get_by_id(current.unit_of_measure_id()).await?,
        };

        if let Some(name) = cmd.name.as_deref() {
            if current.is_renamed_to(name) {
                self.ensure_variant_name_free(
                    current.base_product_id(),
                    name,
                    Some(current.id_typed()),
                )
                .await?;
            }
        }

        let next = current.with_details(&cmd.patch(), ctx.occurred_at)?;

        Self::ensure_not_cancelled(cancel)?;
        self.variants.update(&next).await?;

        tracing::info!(
            variant_id = %next.id_typed(),
            version = next.version(),
            actor = %ctx.actor,
            "variant updated"
        );

        self.publish(
            ctx,
            next.id_typed().0,
            next.version(),
            VariantEvent::VariantUpdated(VariantUpdated {
                variant: next.clone(),
                occurred_at: ctx.occurred_at,
            }),
        )
        .await;

        Ok(VariantDto::project(&next, &base_product, unit.as_ref()))
    }
}
