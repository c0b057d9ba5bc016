//! Read side: variant lookup and the filtered, paged listing.
//!
//! Queries never mutate and enforce no business rules beyond input bounds.

mod variants;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog_core::AggregateId;

use crate::commands::EntityKind;
use crate::repository::RepositoryError;

pub use variants::ListVariants;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{entity} {id} was not found")]
    NotFound { entity: EntityKind, id: AggregateId },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One page of a listing.
///
/// `total_count` counts every match of the filters, not just `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size.max(1) as usize)
    }
}
