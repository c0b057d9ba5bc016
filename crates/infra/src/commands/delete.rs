use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use catalog_core::AggregateRoot;
use catalog_products::{ProductVariantId, VariantDeleted, VariantEvent};

use super::{CatalogService, CommandContext, MutationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVariant {
    pub variant_id: ProductVariantId,
}

impl CatalogService {
    /// Remove a variant whose stock is exactly zero.
    ///
    /// A stocked variant is a rule violation (`InvalidOperation`), not a
    /// missing record, and nothing is removed.
    pub async fn delete_variant(
        &self,
        ctx: &CommandContext,
        cmd: DeleteVariant,
        cancel: &CancellationToken,
    ) -> Result<(), MutationError> {
        let variant = self.load_variant(cmd.variant_id).await?;
        variant.ensure_deletable()?;

        Self::ensure_not_cancelled(cancel)?;
        self.variants.delete(&variant).await?;

        tracing::info!(
            variant_id = %variant.id_typed(),
            actor = %ctx.actor,
            "variant deleted"
        );

        // The deletion is the next step in the variant's history.
        self.publish(
            ctx,
            variant.id_typed().0,
            variant.version() + 1,
            VariantEvent::VariantDeleted(VariantDeleted {
                variant_id: variant.id_typed(),
                base_product_id: variant.base_product_id(),
                occurred_at: ctx.occurred_at,
            }),
        )
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::AggregateId;

    use super::*;
    use crate::ErrorKind;
    use crate::repository::ProductVariantRepository;
    use crate::test_support::Harness;

    #[tokio::test]
    async fn deletes_variant_without_stock() {
        let h = Harness::new();
        let base = h.base_product("Laptop Pro").await;
        let unit = h.unit("Piece", "pc").await;
        let id = h.variant(base, unit, "Silver", 0).await;
        let sub = h.subscribe();

        h.service
            .delete_variant(&h.ctx(), DeleteVariant { variant_id: id }, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(h.variants.get_by_id(id).await.unwrap(), None);
        let env = sub.try_recv().unwrap();
        assert_eq!(env.event_type(), "catalog.variant.deleted");
        assert_eq!(env.sequence_number(), 2);
    }

    #[tokio::test]
    async fn stocked_variant_is_invalid_operation_and_kept() {
        let h = Harness::new();
        let base = h.base_product("Laptop Pro").await;
        let unit = h.unit("Piece", "pc").await;
        let id = h.variant(base, unit, "Silver", 4).await;
        let before = h.variants.get_by_id(id).await.unwrap();
        let sub = h.subscribe();

        let err = h
            .service
            .delete_variant(&h.ctx(), DeleteVariant { variant_id: id }, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(err.to_string().contains("4 units"));
        assert_eq!(h.variants.get_by_id(id).await.unwrap(), before);
        assert!(sub.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_variant_is_not_found() {
        let h = Harness::new();
        let ghost = ProductVariantId::new(AggregateId::new());

        let err = h
            .service
            .delete_variant(&h.ctx(), DeleteVariant { variant_id: ghost }, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
