use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{AggregateId, AggregateRoot, DomainError, DomainResult};
use catalog_events::Event;

use crate::base_product::BaseProductId;
use crate::dynamic::DynamicProperties;
use crate::unit::UnitOfMeasureId;

/// Longest accepted variant name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Product variant identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductVariantId(pub AggregateId);

impl ProductVariantId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductVariantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Reference to a stored photo (object-storage key or URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(pub String);

/// Input for `ProductVariant::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVariant {
    pub base_product_id: BaseProductId,
    pub name: String,
    /// Defaults to 0 when absent.
    pub stock_quantity: Option<i64>,
    pub unit_of_measure_id: UnitOfMeasureId,
    pub unit_value: Decimal,
    pub usage_notes: Option<String>,
    pub photos: Vec<PhotoRef>,
    pub dynamic_properties: DynamicProperties,
}

/// Partial update of a variant's details.
///
/// `None` keeps the current value. `usage_notes: Some("")` clears the notes.
/// `dynamic_properties: Some(..)` replaces the whole map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPatch {
    pub name: Option<String>,
    pub unit_of_measure_id: Option<UnitOfMeasureId>,
    pub unit_value: Option<Decimal>,
    pub usage_notes: Option<String>,
    pub stock_quantity: Option<i64>,
    pub photos: Option<Vec<PhotoRef>>,
    pub dynamic_properties: Option<DynamicProperties>,
}

/// Aggregate root: ProductVariant.
///
/// Mutations never happen in place: `with_details` and `with_dynamic_properties`
/// validate first and return the next state, leaving `self` untouched on error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    id: ProductVariantId,
    base_product_id: BaseProductId,
    name: String,
    stock_quantity: i64,
    unit_of_measure_id: UnitOfMeasureId,
    unit_value: Decimal,
    usage_notes: Option<String>,
    photos: Vec<PhotoRef>,
    dynamic_properties: DynamicProperties,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl ProductVariant {
    /// Factory: validate input and build version 1 of a new variant.
    ///
    /// Existence of the base product and unit, and name uniqueness within the
    /// base product, are cross-aggregate rules checked by the caller.
    pub fn create(
        id: ProductVariantId,
        input: NewVariant,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            base_product_id: input.base_product_id,
            name: normalize_name(&input.name)?,
            stock_quantity: ensure_stock(input.stock_quantity.unwrap_or(0))?,
            unit_of_measure_id: input.unit_of_measure_id,
            unit_value: ensure_unit_value(input.unit_value)?,
            usage_notes: normalize_notes(input.usage_notes.as_deref()),
            photos: ensure_photos(input.photos)?,
            dynamic_properties: input.dynamic_properties.normalized()?,
            created_at: occurred_at,
            updated_at: occurred_at,
            version: 1,
        })
    }

    pub fn id_typed(&self) -> ProductVariantId {
        self.id
    }

    pub fn base_product_id(&self) -> BaseProductId {
        self.base_product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stock_quantity(&self) -> i64 {
        self.stock_quantity
    }

    pub fn unit_of_measure_id(&self) -> UnitOfMeasureId {
        self.unit_of_measure_id
    }

    pub fn unit_value(&self) -> Decimal {
        self.unit_value
    }

    pub fn usage_notes(&self) -> Option<&str> {
        self.usage_notes.as_deref()
    }

    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    pub fn dynamic_properties(&self) -> &DynamicProperties {
        &self.dynamic_properties
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `candidate` would change this variant's name once normalized.
    pub fn is_renamed_to(&self, candidate: &str) -> bool {
        candidate.trim() != self.name
    }

    /// Apply a partial update (PATCH semantics) as a single version step.
    pub fn with_details(&self, patch: &VariantPatch, occurred_at: DateTime<Utc>) -> DomainResult<Self> {
        let mut next = self.clone();

        if let Some(name) = &patch.name {
            next.name = normalize_name(name)?;
        }
        if let Some(unit_id) = patch.unit_of_measure_id {
            next.unit_of_measure_id = unit_id;
        }
        if let Some(value) = patch.unit_value {
            next.unit_value = ensure_unit_value(value)?;
        }
        if let Some(notes) = &patch.usage_notes {
            next.usage_notes = normalize_notes(Some(notes));
        }
        if let Some(quantity) = patch.stock_quantity {
            next.stock_quantity = ensure_stock(quantity)?;
        }
        if let Some(photos) = &patch.photos {
            next.photos = ensure_photos(photos.clone())?;
        }
        if let Some(properties) = &patch.dynamic_properties {
            next.dynamic_properties = properties.clone().normalized()?;
        }

        next.touch(occurred_at);
        Ok(next)
    }

    /// Replace the dynamic properties wholesale. Keys absent from `properties`
    /// are dropped; nothing is merged.
    pub fn with_dynamic_properties(
        &self,
        properties: DynamicProperties,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let patch = VariantPatch {
            dynamic_properties: Some(properties),
            ..VariantPatch::default()
        };
        self.with_details(&patch, occurred_at)
    }

    /// A variant may only be removed once its stock is exactly zero.
    pub fn ensure_deletable(&self) -> DomainResult<()> {
        if self.stock_quantity != 0 {
            return Err(DomainError::invariant(format!(
                "variant {} still has {} units in stock",
                self.id, self.stock_quantity
            )));
        }
        Ok(())
    }

    /// Scoped uniqueness: no other variant of `base_product_id` may already use `name`.
    ///
    /// `exclude` is the variant being renamed, so it does not collide with itself.
    /// Variants of other base products are ignored.
    pub fn ensure_name_available<'a>(
        base_product_id: BaseProductId,
        name: &str,
        exclude: Option<ProductVariantId>,
        existing: impl IntoIterator<Item = &'a ProductVariant>,
    ) -> DomainResult<()> {
        let name = name.trim();
        let taken = existing.into_iter().any(|v| {
            v.base_product_id == base_product_id && Some(v.id) != exclude && v.name == name
        });
        if taken {
            return Err(DomainError::conflict(format!(
                "variant name '{name}' already exists for base product {base_product_id}"
            )));
        }
        Ok(())
    }

    fn touch(&mut self, occurred_at: DateTime<Utc>) {
        self.updated_at = occurred_at;
        self.version += 1;
    }
}

impl AggregateRoot for ProductVariant {
    type Id = ProductVariantId;

    const AGGREGATE_TYPE: &'static str = "catalog.variant";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

fn normalize_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn normalize_notes(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}

fn ensure_stock(quantity: i64) -> DomainResult<i64> {
    if quantity < 0 {
        return Err(DomainError::validation(format!(
            "stock quantity cannot be negative (got {quantity})"
        )));
    }
    Ok(quantity)
}

fn ensure_unit_value(value: Decimal) -> DomainResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "unit value cannot be negative (got {value})"
        )));
    }
    Ok(value)
}

fn ensure_photos(photos: Vec<PhotoRef>) -> DomainResult<Vec<PhotoRef>> {
    if photos.iter().any(|p| p.0.trim().is_empty()) {
        return Err(DomainError::validation("photo references cannot be empty"));
    }
    Ok(photos)
}

/// Event: VariantCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCreated {
    pub variant: ProductVariant,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantUpdated (carries the full post-update state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantUpdated {
    pub variant: ProductVariant,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDeleted {
    pub variant_id: ProductVariantId,
    pub base_product_id: BaseProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantEvent {
    VariantCreated(VariantCreated),
    VariantUpdated(VariantUpdated),
    VariantDeleted(VariantDeleted),
}

impl Event for VariantEvent {
    fn event_type(&self) -> &'static str {
        match self {
            VariantEvent::VariantCreated(_) => "catalog.variant.created",
            VariantEvent::VariantUpdated(_) => "catalog.variant.updated",
            VariantEvent::VariantDeleted(_) => "catalog.variant.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            VariantEvent::VariantCreated(e) => e.occurred_at,
            VariantEvent::VariantUpdated(e) => e.occurred_at,
            VariantEvent::VariantDeleted(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynamicValue;

    fn test_variant_id() -> ProductVariantId {
        ProductVariantId::new(AggregateId::new())
    }

    fn test_base_product_id() -> BaseProductId {
        BaseProductId::new(AggregateId::new())
    }

    fn test_unit_id() -> UnitOfMeasureId {
        UnitOfMeasureId::new(AggregateId::new())
    }

    fn new_variant(base_product_id: BaseProductId, name: &str) -> NewVariant {
        NewVariant {
            base_product_id,
            name: name.to_string(),
            stock_quantity: None,
            unit_of_measure_id: test_unit_id(),
            unit_value: Decimal::new(15, 1),
            usage_notes: Some("Keep dry".to_string()),
            photos: vec![PhotoRef("photos/a.jpg".to_string())],
            dynamic_properties: [("color", "red")].into_iter().collect(),
        }
    }

    fn test_variant() -> ProductVariant {
        ProductVariant::create(test_variant_id(), new_variant(test_base_product_id(), "Red"), Utc::now())
            .unwrap()
    }

    #[test]
    fn create_defaults_stock_to_zero() {
        let variant = test_variant();
        assert_eq!(variant.stock_quantity(), 0);
        assert_eq!(variant.version(), 1);
        assert_eq!(variant.created_at(), variant.updated_at());
    }

    #[test]
    fn create_rejects_negative_stock() {
        let mut input = new_variant(test_base_product_id(), "Red");
        input.stock_quantity = Some(-1);

        let err = ProductVariant::create(test_variant_id(), input, Utc::now()).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("negative")),
            _ => panic!("Expected Validation error for negative stock"),
        }
    }

    #[test]
    fn create_rejects_overlong_name() {
        let input = new_variant(test_base_product_id(), &"x".repeat(MAX_NAME_LEN + 1));
        assert!(ProductVariant::create(test_variant_id(), input, Utc::now()).is_err());
    }

    #[test]
    fn with_details_only_touches_supplied_fields() {
        let variant = test_variant();
        let patch = VariantPatch {
            stock_quantity: Some(15),
            ..VariantPatch::default()
        };

        let next = variant.with_details(&patch, Utc::now()).unwrap();

        assert_eq!(next.stock_quantity(), 15);
        assert_eq!(next.name(), variant.name());
        assert_eq!(next.unit_of_measure_id(), variant.unit_of_measure_id());
        assert_eq!(next.unit_value(), variant.unit_value());
        assert_eq!(next.usage_notes(), variant.usage_notes());
        assert_eq!(next.photos(), variant.photos());
        assert_eq!(next.dynamic_properties(), variant.dynamic_properties());
        assert_eq!(next.version(), variant.version() + 1);
    }

    #[test]
    fn with_details_clears_notes_on_blank_input() {
        let variant = test_variant();
        let patch = VariantPatch {
            usage_notes: Some("  ".to_string()),
            ..VariantPatch::default()
        };

        let next = variant.with_details(&patch, Utc::now()).unwrap();
        assert_eq!(next.usage_notes(), None);
    }

    #[test]
    fn with_details_rejects_negative_stock_without_side_effects() {
        let variant = test_variant();
        let before = variant.clone();
        let patch = VariantPatch {
            name: Some("Blue".to_string()),
            stock_quantity: Some(-5),
            ..VariantPatch::default()
        };

        assert!(variant.with_details(&patch, Utc::now()).is_err());
        assert_eq!(variant, before);
    }

    #[test]
    fn with_details_rejects_negative_unit_value() {
        let variant = test_variant();
        let patch = VariantPatch {
            unit_value: Some(Decimal::new(-1, 0)),
            ..VariantPatch::default()
        };

        assert!(variant.with_details(&patch, Utc::now()).is_err());
    }

    #[test]
    fn details_and_properties_together_are_one_version_step() {
        let variant = test_variant();
        let patch = VariantPatch {
            stock_quantity: Some(1),
            dynamic_properties: Some([("size", DynamicValue::from("M"))].into_iter().collect()),
            ..VariantPatch::default()
        };

        let next = variant.with_details(&patch, Utc::now()).unwrap();

        assert_eq!(next.stock_quantity(), 1);
        assert_eq!(next.dynamic_properties().get("size"), Some(&DynamicValue::from("M")));
        assert_eq!(next.version(), variant.version() + 1);
    }

    #[test]
    fn dynamic_properties_are_replaced_not_merged() {
        let variant = test_variant();
        let replacement: DynamicProperties = [("size", DynamicValue::from("XL"))].into_iter().collect();

        let next = variant
            .with_dynamic_properties(replacement.clone(), Utc::now())
            .unwrap();

        assert_eq!(next.dynamic_properties(), &replacement);
        assert!(next.dynamic_properties().get("color").is_none());
    }

    #[test]
    fn ensure_deletable_requires_zero_stock() {
        let variant = test_variant();
        assert!(variant.ensure_deletable().is_ok());

        let stocked = variant
            .with_details(
                &VariantPatch {
                    stock_quantity: Some(3),
                    ..VariantPatch::default()
                },
                Utc::now(),
            )
            .unwrap();

        match stocked.ensure_deletable().unwrap_err() {
            DomainError::InvariantViolation(msg) => assert!(msg.contains("3 units")),
            _ => panic!("Expected InvariantViolation for stocked variant"),
        }
    }

    #[test]
    fn name_uniqueness_is_scoped_to_base_product() {
        let base = test_base_product_id();
        let other_base = test_base_product_id();
        let existing = ProductVariant::create(test_variant_id(), new_variant(base, "Red"), Utc::now()).unwrap();
        let elsewhere =
            ProductVariant::create(test_variant_id(), new_variant(other_base, "Blue"), Utc::now()).unwrap();
        let all = [existing.clone(), elsewhere];

        let err = ProductVariant::ensure_name_available(base, " Red ", None, &all).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Same name under another base product is fine.
        assert!(ProductVariant::ensure_name_available(base, "Blue", None, &all).is_ok());
        // A variant never collides with itself.
        assert!(ProductVariant::ensure_name_available(base, "Red", Some(existing.id_typed()), &all).is_ok());
    }

    #[test]
    fn is_renamed_to_ignores_surrounding_whitespace() {
        let variant = test_variant();
        assert!(!variant.is_renamed_to("  Red "));
        assert!(variant.is_renamed_to("red"));
    }

    #[test]
    fn event_types_are_stable() {
        let variant = test_variant();
        let at = Utc::now();
        let created = VariantEvent::VariantCreated(VariantCreated {
            variant: variant.clone(),
            occurred_at: at,
        });
        let deleted = VariantEvent::VariantDeleted(VariantDeleted {
            variant_id: variant.id_typed(),
            base_product_id: variant.base_product_id(),
            occurred_at: at,
        });

        assert_eq!(created.event_type(), "catalog.variant.created");
        assert_eq!(deleted.event_type(), "catalog.variant.deleted");
        assert_eq!(deleted.occurred_at(), at);
    }

    #[test]
    fn events_survive_json_round_trip() {
        let variant = test_variant();
        let ev = VariantEvent::VariantUpdated(VariantUpdated {
            variant,
            occurred_at: Utc::now(),
        });

        let json = serde_json::to_value(&ev).unwrap();
        let back: VariantEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: no accepted update ever leaves stock negative.
            #[test]
            fn stock_is_never_negative(quantity in any::<i64>()) {
                let variant = test_variant();
                let patch = VariantPatch {
                    stock_quantity: Some(quantity),
                    ..VariantPatch::default()
                };

                match variant.with_details(&patch, Utc::now()) {
                    Ok(next) => {
                        prop_assert!(quantity >= 0);
                        prop_assert_eq!(next.stock_quantity(), quantity);
                    }
                    Err(_) => prop_assert!(quantity < 0),
                }
            }

            /// Property: the property map after replacement is exactly the new map.
            #[test]
            fn replacement_is_wholesale(
                entries in proptest::collection::btree_map("[a-z]{1,8}", "[A-Za-z0-9]{0,8}", 0..8)
            ) {
                let variant = test_variant();
                let replacement: DynamicProperties = entries.clone().into_iter().collect();

                let next = variant.with_dynamic_properties(replacement, Utc::now()).unwrap();

                prop_assert_eq!(next.dynamic_properties().len(), entries.len());
                for (k, v) in &entries {
                    prop_assert_eq!(next.dynamic_properties().get(k), Some(&DynamicValue::from(v.as_str())));
                }
            }

            /// Property: every accepted mutation bumps the version by exactly one.
            #[test]
            fn version_increments_by_one(name in "[A-Za-z][A-Za-z0-9 ]{0,40}") {
                let variant = test_variant();
                let patch = VariantPatch {
                    name: Some(name),
                    ..VariantPatch::default()
                };

                let next = variant.with_details(&patch, Utc::now()).unwrap();
                prop_assert_eq!(next.version(), variant.version() + 1);
            }
        }
    }
}
