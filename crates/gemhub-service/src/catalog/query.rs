//! Catalog Query Builder.
//!
//! Turns caller-supplied listing parameters into a [`ProductQuery`].
//! Operator listings are forced onto the caller's own products unless the
//! caller holds the top role; public listings are always narrowed to
//! approved, available products. Neither scoping can be overridden by a
//! parameter.

use serde::{Deserialize, Serialize};

use gemhub_core::config::CatalogConfig;
use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::types::{CategoryId, FilterField, PageRequest, SortDirection, SortField};
use gemhub_database::query::ProductQuery;
use gemhub_entity::product::{
    AvailabilityStatus, ColorGrade, ModerationStatus, OriginCountry, ProductField, Shape,
};

use crate::context::RequestContext;

/// Filters accepted by the operator listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorListParams {
    /// Availability status.
    pub status: Option<AvailabilityStatus>,
    /// Moderation status.
    pub moderation_status: Option<ModerationStatus>,
    /// Shape.
    pub shape: Option<Shape>,
    /// Colour grade.
    pub color_grade: Option<ColorGrade>,
    /// Origin country.
    pub origin: Option<OriginCountry>,
    /// Featured flag.
    pub featured: Option<bool>,
    /// When `true`, only unheated stones.
    pub unheated: Option<bool>,
    /// Category.
    pub category: Option<CategoryId>,
    /// Free text matched against name, descriptions, SKU and tags.
    pub search: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Page size.
    pub page_size: Option<u64>,
    /// Sort field name.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

/// Filters accepted by the public listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicListParams {
    /// Category slug or id.
    pub category: Option<String>,
    /// Featured flag.
    pub featured: Option<bool>,
    /// Free text matched against name, descriptions, SKU and tags.
    pub search: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Page size.
    pub page_size: Option<u64>,
    /// Sort field name.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

/// Builds product queries for the two listing call sites.
#[derive(Debug, Clone)]
pub struct CatalogQueryBuilder {
    admin_page_size: u64,
    public_page_size: u64,
}

impl CatalogQueryBuilder {
    /// Creates a builder using the configured default page sizes.
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            admin_page_size: config.admin_page_size,
            public_page_size: config.public_page_size,
        }
    }

    /// Build the operator listing query.
    pub fn operator(&self, ctx: &RequestContext, params: &OperatorListParams) -> AppResult<ProductQuery> {
        let page = PageRequest::or_default(params.page, params.page_size, self.admin_page_size);
        let mut query = ProductQuery::new(page);

        if !ctx.is_top_role() {
            query
                .filters
                .push(FilterField::eq(ProductField::CreatedBy, ctx.user_id.into_uuid()));
        }
        if let Some(status) = params.status {
            query.filters.push(FilterField::eq(ProductField::Status, status.as_str()));
        }
        if let Some(status) = params.moderation_status {
            query
                .filters
                .push(FilterField::eq(ProductField::ModerationStatus, status.as_str()));
        }
        if let Some(shape) = params.shape {
            query.filters.push(FilterField::eq(ProductField::Shape, shape.as_str()));
        }
        if let Some(grade) = params.color_grade {
            query.filters.push(FilterField::eq(ProductField::ColorGrade, grade.as_str()));
        }
        if let Some(origin) = params.origin {
            query
                .filters
                .push(FilterField::eq(ProductField::OriginCountry, origin.as_str()));
        }
        if let Some(featured) = params.featured {
            query.filters.push(FilterField::eq(ProductField::Featured, featured));
        }
        if params.unheated == Some(true) {
            query.filters.push(FilterField::eq(ProductField::Heated, false));
        }
        if let Some(category) = params.category {
            query
                .filters
                .push(FilterField::eq(ProductField::Category, category.into_uuid()));
        }
        query.any_of = search_terms(params.search.as_deref());
        query.sort = match params.sort_by.as_deref() {
            Some(field) => vec![parse_sort(field, params.sort_order.as_deref())?],
            None => vec![SortField::desc(ProductField::CreatedAt)],
        };
        Ok(query)
    }

    /// Build the public listing query. `category` is the already-resolved
    /// category filter.
    pub fn public(&self, params: &PublicListParams, category: Option<CategoryId>) -> AppResult<ProductQuery> {
        let page = PageRequest::or_default(params.page, params.page_size, self.public_page_size);
        let mut query = ProductQuery::new(page);

        query.filters.push(FilterField::eq(
            ProductField::Status,
            AvailabilityStatus::Available.as_str(),
        ));
        query.filters.push(FilterField::eq(
            ProductField::ModerationStatus,
            ModerationStatus::Approved.as_str(),
        ));
        if let Some(category) = category {
            query
                .filters
                .push(FilterField::eq(ProductField::Category, category.into_uuid()));
        }
        if let Some(featured) = params.featured {
            query.filters.push(FilterField::eq(ProductField::Featured, featured));
        }
        query.any_of = search_terms(params.search.as_deref());
        query.sort = match params.sort_by.as_deref() {
            Some(field) => vec![parse_sort(field, params.sort_order.as_deref())?],
            None => vec![
                SortField::desc(ProductField::Featured),
                SortField::desc(ProductField::CreatedAt),
            ],
        };
        Ok(query)
    }
}

/// Expand free text into the OR-group over the searchable fields.
fn search_terms(search: Option<&str>) -> Vec<FilterField<ProductField>> {
    let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) else {
        return Vec::new();
    };
    [
        ProductField::Name,
        ProductField::ShortDescription,
        ProductField::FullDescription,
        ProductField::Sku,
        ProductField::Tags,
    ]
    .into_iter()
    .map(|field| FilterField::contains(field, term))
    .collect()
}

fn parse_sort(field: &str, order: Option<&str>) -> AppResult<SortField<ProductField>> {
    let field: ProductField = field.parse()?;
    if !field.is_sortable() {
        return Err(AppError::validation(format!("Cannot sort by {field}")));
    }
    let direction = order.map_or(SortDirection::Desc, SortDirection::parse_lenient);
    Ok(SortField::new(field, direction))
}
