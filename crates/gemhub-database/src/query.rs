//! Backend-neutral query descriptions.
//!
//! The service layer builds a [`ProductQuery`] out of whitelisted fields;
//! each repository implementation renders it (SQL for PostgreSQL, direct
//! evaluation for the in-memory store). Both renderings share the same
//! semantics, including ordering of missing values.

use std::cmp::Ordering;

use gemhub_core::types::{CategoryId, FilterField, PageRequest, SortDirection, SortField};
use gemhub_entity::category::Category;
use gemhub_entity::product::{Product, ProductField};

/// A filtered, sorted, paginated product query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Conditions that must all hold.
    pub filters: Vec<FilterField<ProductField>>,
    /// Conditions of which at least one must hold (ignored when empty).
    pub any_of: Vec<FilterField<ProductField>>,
    /// Sort keys, most significant first. Ties break on id.
    pub sort: Vec<SortField<ProductField>>,
    /// Requested page.
    pub page: PageRequest,
}

impl ProductQuery {
    /// An unfiltered query for the given page.
    pub fn new(page: PageRequest) -> Self {
        Self {
            filters: Vec::new(),
            any_of: Vec::new(),
            sort: Vec::new(),
            page,
        }
    }

    /// Whether `product` satisfies the predicate.
    pub fn matches(&self, product: &Product) -> bool {
        let all = self
            .filters
            .iter()
            .all(|f| product.field_value(f.field).matches(f.op, &f.value));
        let any = self.any_of.is_empty()
            || self
                .any_of
                .iter()
                .any(|f| product.field_value(f.field).matches(f.op, &f.value));
        all && any
    }

    /// Order two products by the sort keys.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        for key in self.sort.iter().filter(|k| k.field.is_sortable()) {
            let ord = a.field_value(key.field).compare(&b.field_value(key.field));
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.id.as_uuid().cmp(b.id.as_uuid())
    }
}

/// Parent scoping for category listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParentFilter {
    /// No parent restriction.
    #[default]
    Any,
    /// Top-level categories only.
    TopLevel,
    /// Direct children of the given category.
    ChildrenOf(CategoryId),
}

/// Category listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Include inactive categories.
    pub include_inactive: bool,
    /// Parent scoping.
    pub parent: ParentFilter,
}

impl CategoryFilter {
    /// Active categories only, any level.
    pub fn active() -> Self {
        Self::default()
    }

    /// Whether `category` passes the filter.
    pub fn matches(&self, category: &Category) -> bool {
        if !self.include_inactive && !category.is_active {
            return false;
        }
        match self.parent {
            ParentFilter::Any => true,
            ParentFilter::TopLevel => category.parent_id.is_none(),
            ParentFilter::ChildrenOf(parent) => category.parent_id == Some(parent),
        }
    }
}
