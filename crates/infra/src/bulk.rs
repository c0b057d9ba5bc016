//! Bulk variant update with per-item fault isolation.
//!
//! Each item runs through the same pipeline as `CatalogService::update_variant`,
//! strictly in input order and one at a time. A failing item is recorded and
//! the batch moves on; items that already succeeded stay committed. The unit of
//! atomicity is the item, never the batch.
//!
//! Items run sequentially because the scoped name-uniqueness check is a
//! read-then-write: two concurrent renames could both pass it.
//!
//! Cancellation is checked between items. Items not yet started when the token
//! fires are reported with `ErrorKind::Cancelled` so the counts still add up.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use catalog_products::ProductVariantId;

use crate::commands::{CatalogService, CommandContext, ErrorKind, MutationError, UpdateVariant, VariantDto};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateVariants {
    pub updates: Vec<UpdateVariant>,
}

/// One failed item of a bulk batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateError {
    pub variant_id: ProductVariantId,
    pub error_message: String,
    pub error_kind: ErrorKind,
}

/// Outcome of a bulk batch.
///
/// `successful_updates == updated_variants.len()` and
/// `failed_updates == errors.len()`; together they always equal `total_updates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResult {
    pub total_updates: usize,
    pub successful_updates: usize,
    pub failed_updates: usize,
    pub updated_variants: Vec<VariantDto>,
    pub errors: Vec<BulkUpdateError>,
}

impl BulkUpdateResult {
    fn from_parts(total_updates: usize, updated_variants: Vec<VariantDto>, errors: Vec<BulkUpdateError>) -> Self {
        debug_assert_eq!(updated_variants.len() + errors.len(), total_updates);

        Self {
            total_updates,
            successful_updates: updated_variants.len(),
            failed_updates: errors.len(),
            updated_variants,
            errors,
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl CatalogService {
    /// Apply every update in `cmd`, isolating failures per item.
    ///
    /// Only a batch larger than the configured limit is rejected as a whole
    /// (`InvalidOperation`, nothing processed). Every other failure, storage
    /// faults included, lands in `errors`.
    pub async fn bulk_update_variants(
        &self,
        ctx: &CommandContext,
        cmd: BulkUpdateVariants,
        cancel: &CancellationToken,
    ) -> Result<BulkUpdateResult, MutationError> {
        let total_updates = cmd.updates.len();
        if total_updates > self.config.max_bulk_items {
            return Err(MutationError::InvalidOperation(format!(
                "batch of {total_updates} updates exceeds the limit of {}",
                self.config.max_bulk_items
            )));
        }

        let mut updated_variants = Vec::with_capacity(total_updates);
        let mut errors = Vec::new();

        for update in cmd.updates {
            let variant_id = update.variant_id;

            let outcome = if cancel.is_cancelled() {
                Err(MutationError::Cancelled)
            } else {
                self.update_variant(ctx, update, cancel).await
            };

            match outcome {
                Ok(dto) => updated_variants.push(dto),
                Err(err) => {
                    tracing::warn!(
                        variant_id = %variant_id,
                        error_kind = ?err.kind(),
                        error = %err,
                        "bulk item failed"
                    );
                    errors.push(BulkUpdateError {
                        variant_id,
                        error_message: err.to_string(),
                        error_kind: err.kind(),
                    });
                }
            }
        }

        let result = BulkUpdateResult::from_parts(total_updates, updated_variants, errors);
        tracing::info!(
            total = result.total_updates,
            succeeded = result.successful_updates,
            failed = result.failed_updates,
            actor = %ctx.actor,
            "bulk update finished"
        );

        Ok(result)
    }
}
