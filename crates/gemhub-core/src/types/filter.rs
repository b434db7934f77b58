//! Filter types for dynamic query building.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Case-insensitive substring match. On list-valued fields, matches
    /// when any element contains the value.
    Contains,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// A boolean value.
    Boolean(bool),
    /// A UUID value.
    Uuid(Uuid),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// A single filter condition on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField<F> {
    /// The field to filter on.
    pub field: F,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl<F> FilterField<F> {
    /// Create a new filter field.
    pub fn new(field: F, op: FilterOp, value: FilterValue) -> Self {
        Self { field, op, value }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: F, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    /// Shorthand for a case-insensitive substring filter.
    pub fn contains(field: F, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Contains, FilterValue::String(needle.into()))
    }
}
