//! Sorting types for list queries.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse a caller-supplied order; anything but `asc` sorts descending.
    pub fn parse_lenient(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// A sort specification consisting of a field and direction.
///
/// The field type is chosen by each entity so that only whitelisted
/// fields can ever reach a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField<F> {
    /// Field to sort by.
    pub field: F,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl<F> SortField<F> {
    /// Create a new sort field.
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Create an ascending sort on the given field.
    pub fn asc(field: F) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Create a descending sort on the given field.
    pub fn desc(field: F) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}
