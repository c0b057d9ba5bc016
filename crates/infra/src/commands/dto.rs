use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::AggregateRoot;
use catalog_products::{
    BaseProduct, BaseProductId, CategoryId, DynamicProperties, PhotoRef, ProductVariant,
    ProductVariantId, UnitOfMeasure, UnitOfMeasureId,
};

/// Flattened read view of a variant, enriched with its base product and unit.
///
/// Returned by the mutation handlers and the listing query alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDto {
    pub id: ProductVariantId,
    pub base_product_id: BaseProductId,
    pub base_product_name: String,
    pub base_product_description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub stock_quantity: i64,
    pub unit_of_measure_id: UnitOfMeasureId,
    pub unit_name: Option<String>,
    pub unit_symbol: Option<String>,
    pub unit_value: Decimal,
    pub usage_notes: Option<String>,
    pub photos: Vec<PhotoRef>,
    pub dynamic_properties: DynamicProperties,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl VariantDto {
    /// `unit` may be absent if the referenced unit is no longer stored; the
    /// unit display fields are left empty in that case.
    pub fn project(
        variant: &ProductVariant,
        base_product: &BaseProduct,
        unit: Option<&UnitOfMeasure>,
    ) -> Self {
        Self {
            id: variant.id_typed(),
            base_product_id: base_product.id_typed(),
            base_product_name: base_product.name().to_string(),
            base_product_description: base_product.description().map(str::to_string),
            category_id: base_product.category_id(),
            name: variant.name().to_string(),
            stock_quantity: variant.stock_quantity(),
            unit_of_measure_id: variant.unit_of_measure_id(),
            unit_name: unit.map(|u| u.name().to_string()),
            unit_symbol: unit.map(|u| u.symbol().to_string()),
            unit_value: variant.unit_value(),
            usage_notes: variant.usage_notes().map(str::to_string),
            photos: variant.photos().to_vec(),
            dynamic_properties: variant.dynamic_properties().clone(),
            created_at: variant.created_at(),
            updated_at: variant.updated_at(),
            version: variant.version(),
        }
    }
}
