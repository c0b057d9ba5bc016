//! Infrastructure layer: repository ports and adapters, command handlers,
//! the bulk orchestrator, queries, and configuration.

pub mod bulk;
pub mod commands;
pub mod config;
pub mod queries;
pub mod repository;

#[cfg(test)]
mod test_support;

pub use bulk::{BulkUpdateError, BulkUpdateResult, BulkUpdateVariants};
pub use commands::{
    CatalogService, CommandContext, CreateBaseProduct, CreateUnitOfMeasure, CreateVariant,
    DeleteVariant, EntityKind, ErrorKind, MutationError, UpdateVariant, VariantDto,
};
pub use config::{CatalogConfig, ConfigError};
pub use queries::{ListVariants, Page, QueryError};
