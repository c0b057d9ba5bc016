//! Open-ended variant attributes (size, color, wattage, ...).
//!
//! Keys are free-form, values are restricted to a small closed set of JSON
//! scalar kinds. Nested objects, arrays and `null` are rejected at the serde
//! boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, ValueObject};

/// A single dynamic attribute value.
///
/// Serialized untagged so the wire form stays natural JSON:
/// `{"color": "red", "weight": 1.5, "wireless": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DynamicValue {
    Boolean(bool),
    Number(serde_json::Number),
    Text(String),
}

impl ValueObject for DynamicValue {}

impl From<&str> for DynamicValue {
    fn from(value: &str) -> Self {
        DynamicValue::Text(value.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(value: String) -> Self {
        DynamicValue::Text(value)
    }
}

impl From<bool> for DynamicValue {
    fn from(value: bool) -> Self {
        DynamicValue::Boolean(value)
    }
}

impl From<i64> for DynamicValue {
    fn from(value: i64) -> Self {
        DynamicValue::Number(value.into())
    }
}

/// String-keyed map of dynamic attributes.
///
/// No per-key `insert`/`merge`: a variant's properties are only ever replaced
/// as a whole (see `ProductVariant::with_dynamic_properties`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicProperties(BTreeMap<String, DynamicValue>);

impl ValueObject for DynamicProperties {}

impl DynamicProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a property map, rejecting blank keys.
    ///
    /// Keys are trimmed; two keys that collide after trimming are rejected too.
    pub fn try_from_map(map: BTreeMap<String, DynamicValue>) -> DomainResult<Self> {
        let mut out = BTreeMap::new();
        for (key, value) in map {
            let trimmed = key.trim();
            if trimmed.is_empty() {
                return Err(DomainError::validation("dynamic property keys cannot be empty"));
            }
            if out.insert(trimmed.to_string(), value).is_some() {
                return Err(DomainError::validation(format!(
                    "duplicate dynamic property key '{trimmed}'"
                )));
            }
        }
        Ok(Self(out))
    }

    /// Re-validate a map that arrived through serde (which skips key checks).
    pub fn normalized(self) -> DomainResult<Self> {
        Self::try_from_map(self.0)
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DynamicValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for DynamicProperties
where
    K: Into<String>,
    V: Into<DynamicValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
