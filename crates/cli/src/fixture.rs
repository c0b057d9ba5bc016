//! Seed data for the in-memory catalog.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use catalog_infra::{
    CatalogService, CommandContext, CreateBaseProduct, CreateUnitOfMeasure, CreateVariant,
    MutationError,
};

/// Reference data first, then variants, each created through the normal
/// command handlers so the same rules apply as for live traffic.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
    pub units: Vec<CreateUnitOfMeasure>,
    pub base_products: Vec<CreateBaseProduct>,
    pub variants: Vec<CreateVariant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seeded {
    pub units: usize,
    pub base_products: usize,
    pub variants: usize,
}

impl Fixture {
    /// Stops at the first record the handlers reject.
    pub async fn seed(
        self,
        service: &CatalogService,
        ctx: &CommandContext,
        cancel: &CancellationToken,
    ) -> Result<Seeded, MutationError> {
        let seeded = Seeded {
            units: self.units.len(),
            base_products: self.base_products.len(),
            variants: self.variants.len(),
        };

        for unit in self.units {
            service.create_unit_of_measure(ctx, unit).await?;
        }
        for product in self.base_products {
            service.create_base_product(ctx, product).await?;
        }
        for variant in self.variants {
            service.create_variant(ctx, variant, cancel).await?;
        }

        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use catalog_core::UserId;
    use catalog_infra::{BulkUpdateVariants, ErrorKind, ListVariants};

    use super::*;
    use crate::{Bus, in_memory_service};

    const FIXTURE: &str = r#"{
        "units": [
            {"id": "0190f5a0-0000-7000-8000-000000000001", "name": "Piece", "symbol": "pc", "kind": "count"}
        ],
        "baseProducts": [
            {"id": "0190f5a0-0000-7000-8000-000000000010", "name": "Laptop Pro", "description": "14 inch"}
        ],
        "variants": [
            {
                "variantId": "0190f5a0-0000-7000-8000-000000000100",
                "baseProductId": "0190f5a0-0000-7000-8000-000000000010",
                "name": "Silver",
                "unitOfMeasureId": "0190f5a0-0000-7000-8000-000000000001",
                "unitValue": 1,
                "dynamicProperties": {"ram": 16, "color": "silver", "refurbished": false}
            },
            {
                "variantId": "0190f5a0-0000-7000-8000-000000000101",
                "baseProductId": "0190f5a0-0000-7000-8000-000000000010",
                "name": "Space Grey",
                "stockQuantity": 4,
                "unitOfMeasureId": "0190f5a0-0000-7000-8000-000000000001",
                "unitValue": 1
            }
        ]
    }"#;

    const BATCH: &str = r#"{
        "updates": [
            {"variantId": "0190f5a0-0000-7000-8000-000000000100", "stockQuantity": 15},
            {"variantId": "0190f5a0-0000-7000-8000-0000000009ff"},
            {"variantId": "0190f5a0-0000-7000-8000-000000000101", "name": "Silver"}
        ]
    }"#;

    #[tokio::test]
    async fn seeds_fixture_and_runs_batch() {
        let service = in_memory_service(Arc::new(Bus::new()), Default::default());
        let ctx = CommandContext::now(UserId::new());
        let cancel = CancellationToken::new();

        let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        let seeded = fixture.seed(&service, &ctx, &cancel).await.unwrap();
        assert_eq!(
            seeded,
            Seeded {
                units: 1,
                base_products: 1,
                variants: 2
            }
        );

        let listed = service.list_variants(&ListVariants::default()).await.unwrap();
        assert_eq!(listed.total_count, 2);

        let batch: BulkUpdateVariants = serde_json::from_str(BATCH).unwrap();
        let result = service.bulk_update_variants(&ctx, batch, &cancel).await.unwrap();

        assert_eq!(result.total_updates, 3);
        assert_eq!(result.successful_updates, 1);
        let kinds: Vec<_> = result.errors.iter().map(|e| e.error_kind).collect();
        assert_eq!(kinds, vec![ErrorKind::NotFound, ErrorKind::AlreadyExists]);
    }

    #[tokio::test]
    async fn variant_for_unknown_base_product_stops_seeding() {
        let service = in_memory_service(Arc::new(Bus::new()), Default::default());
        let fixture: Fixture = serde_json::from_str(
            r#"{"variants": [{
                "baseProductId": "0190f5a0-0000-7000-8000-000000000010",
                "name": "Orphan",
                "unitOfMeasureId": "0190f5a0-0000-7000-8000-000000000001",
                "unitValue": 1
            }]}"#,
        )
        .unwrap();

        let err = fixture
            .seed(&service, &CommandContext::now(UserId::new()), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
