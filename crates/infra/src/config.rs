//! Configuration loading and representation.
//!
//! Values come from the environment with safe defaults, the same way the
//! process wiring reads its other switches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_DEFAULT_PAGE_SIZE: &str = "CATALOG_DEFAULT_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "CATALOG_MAX_PAGE_SIZE";
pub const ENV_MAX_BULK_ITEMS: &str = "CATALOG_MAX_BULK_ITEMS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Tunables for the catalog handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page size used when a listing request does not specify one.
    pub default_page_size: u32,
    /// Upper bound for listing page sizes; larger requests are clamped.
    pub max_page_size: u32,
    /// Largest batch the bulk update accepts.
    pub max_bulk_items: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            max_bulk_items: 500,
        }
    }
}

impl CatalogConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (unset keys fall back to defaults).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            default_page_size: read_positive(&lookup, ENV_DEFAULT_PAGE_SIZE, defaults.default_page_size)?,
            max_page_size: read_positive(&lookup, ENV_MAX_PAGE_SIZE, defaults.max_page_size)?,
            max_bulk_items: read_positive(&lookup, ENV_MAX_BULK_ITEMS, defaults.max_bulk_items)?,
        };
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid {
                key: ENV_DEFAULT_PAGE_SIZE,
                value: self.default_page_size.to_string(),
                reason: format!("must not exceed max page size {}", self.max_page_size),
            });
        }
        Ok(self)
    }
}

fn read_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: core::str::FromStr + PartialEq + From<u8>,
    T::Err: core::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value: T = raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })?;

    if value == T::from(0) {
        return Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
