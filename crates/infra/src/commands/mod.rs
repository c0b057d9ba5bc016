//! Catalog command handlers (application-level orchestration).
//!
//! Every mutation follows the same pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the target aggregate (NotFound if absent)
//!   ↓
//! 2. Check cross-aggregate rules against sibling state
//!    (base product / unit existence, scoped name uniqueness)
//!   ↓
//! 3. Mutate in memory (aggregate returns the next validated state)
//!   ↓
//! 4. Persist through the repository port (cancellation is checked just before)
//!   ↓
//! 5. Publish the domain event (fire-and-forget, not cancellable)
//!   ↓
//! 6. Project to `VariantDto`
//! ```
//!
//! Handlers are plain async methods on `CatalogService`; there is no mediator
//! lookup between a command and its handler. Single-item handlers fail fast and
//! return every error to the caller. `bulk` is the only place that recovers.

mod catalog;
mod create;
mod delete;
mod dto;
mod error;
mod update;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use catalog_core::{AggregateId, AggregateRoot, UserId};
use catalog_events::{Event, EventEnvelope, EventPublisher};
use catalog_products::{
    BaseProduct, BaseProductId, ProductVariant, ProductVariantId, UnitOfMeasure, UnitOfMeasureId,
    VariantEvent,
};

use crate::config::CatalogConfig;
use crate::repository::{BaseProductRepository, ProductVariantRepository, UnitOfMeasureRepository};

pub use catalog::{CreateBaseProduct, CreateUnitOfMeasure};
pub use create::CreateVariant;
pub use delete::DeleteVariant;
pub use dto::VariantDto;
pub use error::{EntityKind, ErrorKind, MutationError};
pub use update::UpdateVariant;

/// Who is acting, and the business time stamped onto the resulting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub actor: UserId,
    pub occurred_at: DateTime<Utc>,
}

impl CommandContext {
    pub fn new(actor: UserId, occurred_at: DateTime<Utc>) -> Self {
        Self { actor, occurred_at }
    }

    pub fn now(actor: UserId) -> Self {
        Self::new(actor, Utc::now())
    }
}

/// Entry point for catalog commands and queries.
///
/// Holds the ports only; cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct CatalogService {
    pub(crate) variants: Arc<dyn ProductVariantRepository>,
    pub(crate) base_products: Arc<dyn BaseProductRepository>,
    pub(crate) units: Arc<dyn UnitOfMeasureRepository>,
    pub(crate) publisher: Arc<dyn EventPublisher>,
    pub(crate) config: CatalogConfig,
}

impl CatalogService {
    pub fn new(
        variants: Arc<dyn ProductVariantRepository>,
        base_products: Arc<dyn BaseProductRepository>,
        units: Arc<dyn UnitOfMeasureRepository>,
        publisher: Arc<dyn EventPublisher>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            variants,
            base_products,
            units,
            publisher,
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub(crate) async fn load_variant(&self, id: ProductVariantId) -> Result<ProductVariant, MutationError> {
        self.variants
            .get_by_id(id)
            .await?
            .ok_or_else(|| MutationError::not_found(EntityKind::Variant, id.0))
    }

    pub(crate) async fn load_base_product(&self, id: BaseProductId) -> Result<BaseProduct, MutationError> {
        self.base_products
            .get_by_id(id)
            .await?
            .ok_or_else(|| MutationError::not_found(EntityKind::BaseProduct, id.0))
    }

    pub(crate) async fn load_unit(&self, id: UnitOfMeasureId) -> Result<UnitOfMeasure, MutationError> {
        self.units
            .get_by_id(id)
            .await?
            .ok_or_else(|| MutationError::not_found(EntityKind::UnitOfMeasure, id.0))
    }

    /// Scoped uniqueness against the repository: `name` must not be used by
    /// another variant of `base_product_id`.
    async fn ensure_variant_name_free(
        &self,
        base_product_id: BaseProductId,
        name: &str,
        exclude: Option<ProductVariantId>,
    ) -> Result<(), MutationError> {
        let name = name.trim();
        let same_name = self.variants.get_by_name(name).await?;

        ProductVariant::ensure_name_available(base_product_id, name, exclude, &same_name).map_err(
            |_| MutationError::AlreadyExists {
                entity: EntityKind::Variant,
                name: name.to_string(),
                base_product_id: Some(base_product_id),
            },
        )
    }

    /// Last point a command can be abandoned; nothing has been written yet.
    fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), MutationError> {
        if cancel.is_cancelled() {
            return Err(MutationError::Cancelled);
        }
        Ok(())
    }

    /// Publish after persistence. A failed publish is logged and swallowed:
    /// the mutation has already been committed and stays committed.
    async fn publish(
        &self,
        ctx: &CommandContext,
        aggregate_id: AggregateId,
        sequence_number: u64,
        event: VariantEvent,
    ) {
        let envelope = match EventEnvelope::from_typed(
            aggregate_id,
            ProductVariant::AGGREGATE_TYPE,
            sequence_number,
            ctx.actor,
            &event,
        ) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(
                    event_type = event.event_type(),
                    aggregate_id = %aggregate_id,
                    error = %err,
                    "failed to serialize domain event"
                );
                return;
            }
        };

        // Runs after the write has committed, so the caller's token no longer applies.
        if let Err(err) = self.publisher.publish(envelope, &CancellationToken::new()).await {
            tracing::warn!(
                event_type = event.event_type(),
                aggregate_id = %aggregate_id,
                error = %err,
                "domain event was not published"
            );
        }
    }
}

impl core::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
