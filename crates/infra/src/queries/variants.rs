use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use catalog_products::{BaseProductId, ProductVariant, ProductVariantId, UnitOfMeasureId};

use super::{Page, QueryError};
use crate::commands::{CatalogService, EntityKind, VariantDto};
use crate::config::CatalogConfig;

/// Listing filters and paging. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListVariants {
    pub base_product_id: Option<BaseProductId>,
    /// Case-insensitive substring match on the variant name or its base product name.
    pub search_term: Option<String>,
    pub unit_of_measure_id: Option<UnitOfMeasureId>,
    /// 1-based; 0 and absent both mean the first page.
    pub page_number: Option<u32>,
    /// Absent or 0 means the configured default; larger than the maximum is clamped.
    pub page_size: Option<u32>,
}

impl ListVariants {
    fn paging(&self, config: &CatalogConfig) -> (u32, u32) {
        let page_number = self.page_number.filter(|n| *n > 0).unwrap_or(1);
        let page_size = self
            .page_size
            .filter(|s| *s > 0)
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);
        (page_number, page_size)
    }

    fn needle(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn matches(&self, variant: &ProductVariant, base_product_name: &str, needle: Option<&str>) -> bool {
        if self
            .base_product_id
            .is_some_and(|id| id != variant.base_product_id())
        {
            return false;
        }
        if self
            .unit_of_measure_id
            .is_some_and(|id| id != variant.unit_of_measure_id())
        {
            return false;
        }
        match needle {
            Some(needle) => {
                variant.name().to_lowercase().contains(needle)
                    || base_product_name.to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

impl CatalogService {
    pub async fn get_variant(&self, id: ProductVariantId) -> Result<VariantDto, QueryError> {
        let variant = self.variants.get_by_id(id).await?.ok_or(QueryError::NotFound {
            entity: EntityKind::Variant,
            id: id.0,
        })?;
        let base_product = self
            .base_products
            .get_by_id(variant.base_product_id())
            .await?
            .ok_or(QueryError::NotFound {
                entity: EntityKind::BaseProduct,
                id: variant.base_product_id().0,
            })?;
        let unit = self.units.get_by_id(variant.unit_of_measure_id()).await?;

        Ok(VariantDto::project(&variant, &base_product, unit.as_ref()))
    }

    /// Filter, then count, then page. Results are ordered by base product
    /// name, then variant name, then id, so pages are stable.
    pub async fn list_variants(&self, query: &ListVariants) -> Result<Page<VariantDto>, QueryError> {
        let (page_number, page_size) = query.paging(&self.config);
        let needle = query.needle();

        let base_products: HashMap<_, _> = self
            .base_products
            .list()
            .await?
            .into_iter()
            .map(|p| (p.id_typed(), p))
            .collect();
        let units: HashMap<_, _> = self
            .units
            .list()
            .await?
            .into_iter()
            .map(|u| (u.id_typed(), u))
            .collect();

        let mut matching: Vec<VariantDto> = self
            .variants
            .list()
            .await?
            .iter()
            .filter_map(|variant| {
                // Orphans (base product gone) are not listable.
                let base_product = base_products.get(&variant.base_product_id())?;
                query
                    .matches(variant, base_product.name(), needle.as_deref())
                    .then(|| {
                        VariantDto::project(variant, base_product, units.get(&variant.unit_of_measure_id()))
                    })
            })
            .collect();

        matching.sort_by(|a, b| {
            a.base_product_name
                .cmp(&b.base_product_name)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let total_count = matching.len();
        let skip = (page_number as usize - 1).saturating_mul(page_size as usize);
        let items: Vec<VariantDto> = matching.into_iter().skip(skip).take(page_size as usize).collect();

        tracing::debug!(
            page_number,
            page_size,
            total_count,
            returned = items.len(),
            "listed variants"
        );

        Ok(Page {
            items,
            page_number,
            page_size,
            total_count,
        })
    }
}
