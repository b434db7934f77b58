//! Paginated catalog listings and operator statistics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use gemhub_core::result::AppResult;
use gemhub_core::types::{CategoryId, FilterField, PageRequest, PageResponse};
use gemhub_database::query::ProductQuery;
use gemhub_database::repositories::{CategoryRepository, ProductRepository};
use gemhub_entity::product::{ModerationStatus, Product, ProductField};

use super::media_url::MediaUrlResolver;
use super::query::{CatalogQueryBuilder, OperatorListParams, PublicListParams};
use crate::context::RequestContext;

/// Dashboard counts for operators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Products visible to the caller.
    pub total_products: u64,
    /// Of which awaiting review.
    pub pending: u64,
    /// Of which approved.
    pub approved: u64,
    /// Of which rejected.
    pub rejected: u64,
    /// Of which sent back for revision.
    pub needs_revision: u64,
    /// Active categories.
    pub active_categories: u64,
}

/// Runs catalog listings and publishes their media URLs.
#[derive(Clone)]
pub struct CatalogService {
    /// Product repository.
    products: Arc<dyn ProductRepository>,
    /// Category repository (slug resolution, stats).
    categories: Arc<dyn CategoryRepository>,
    /// Query construction.
    builder: CatalogQueryBuilder,
    /// Media URL publication.
    urls: MediaUrlResolver,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish()
    }
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        builder: CatalogQueryBuilder,
        urls: MediaUrlResolver,
    ) -> Self {
        Self {
            products,
            categories,
            builder,
            urls,
        }
    }

    /// Operator listing, scoped to the caller's own products unless the
    /// caller holds the top role.
    pub async fn list_operator(
        &self,
        ctx: &RequestContext,
        params: &OperatorListParams,
    ) -> AppResult<PageResponse<Product>> {
        ctx.require_operator()?;
        let query = self.builder.operator(ctx, params)?;
        debug!(user_id = %ctx.user_id, page = query.page.page, "Operator listing");
        self.run(&query).await
    }

    /// Public storefront listing of approved, available products.
    ///
    /// The category parameter accepts an id or a slug; an unknown slug
    /// yields an empty page.
    pub async fn list_public(&self, params: &PublicListParams) -> AppResult<PageResponse<Product>> {
        let category = match params.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => match self.resolve_category(value).await? {
                Some(id) => Some(id),
                None => {
                    let query = self.builder.public(params, None)?;
                    return Ok(PageResponse::empty(&query.page));
                }
            },
        };
        let query = self.builder.public(params, category)?;
        self.run(&query).await
    }

    /// Product counts by moderation status, scoped like the operator listing.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<CatalogStats> {
        ctx.require_operator()?;
        let scope = self.builder.operator(ctx, &OperatorListParams::default())?;

        let count_with = |status: Option<ModerationStatus>| {
            let mut query = ProductQuery::new(PageRequest::default());
            query.filters = scope.filters.clone();
            if let Some(status) = status {
                query
                    .filters
                    .push(FilterField::eq(ProductField::ModerationStatus, status.as_str()));
            }
            query
        };

        Ok(CatalogStats {
            total_products: self.products.count_matching(&count_with(None)).await?,
            pending: self
                .products
                .count_matching(&count_with(Some(ModerationStatus::Pending)))
                .await?,
            approved: self
                .products
                .count_matching(&count_with(Some(ModerationStatus::Approved)))
                .await?,
            rejected: self
                .products
                .count_matching(&count_with(Some(ModerationStatus::Rejected)))
                .await?,
            needs_revision: self
                .products
                .count_matching(&count_with(Some(ModerationStatus::NeedsRevision)))
                .await?,
            active_categories: self.categories.count_active().await?,
        })
    }

    async fn resolve_category(&self, value: &str) -> AppResult<Option<CategoryId>> {
        if let Ok(id) = value.parse::<CategoryId>() {
            return Ok(Some(id));
        }
        Ok(self.categories.find_by_slug(value).await?.map(|c| c.id))
    }

    /// Fetch one page and count the full predicate separately.
    async fn run(&self, query: &ProductQuery) -> AppResult<PageResponse<Product>> {
        let items = self.products.find_page(query).await?;
        let total = self.products.count_matching(query).await?;
        let page = PageResponse::new(items, query.page.page, query.page.page_size, total);
        Ok(page.map(|mut product| {
            self.urls.publish_product(&mut product);
            product
        }))
    }
}
