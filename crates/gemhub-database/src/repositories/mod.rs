//! Repository traits for catalog documents and their PostgreSQL
//! implementations.
//!
//! Services depend on the traits only; the in-memory implementations in
//! [`crate::memory`] satisfy the same contracts.

pub mod category;
pub mod product;

use async_trait::async_trait;
use chrono::Utc;

use gemhub_core::result::AppResult;
use gemhub_core::traits::Repository;
use gemhub_core::types::{CategoryId, ProductId};
use gemhub_entity::category::Category;
use gemhub_entity::product::Product;

use crate::query::{CategoryFilter, ProductQuery};

pub use category::PgCategoryRepository;
pub use product::PgProductRepository;

/// Result of a conditional category delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The category was removed.
    Deleted,
    /// Another category still names it as parent; nothing was removed.
    HasChildren,
    /// No category with that id exists.
    NotFound,
}

/// Category persistence.
#[async_trait]
pub trait CategoryRepository: Repository<Category, CategoryId> {
    /// Find a category by slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>>;

    /// Load several categories at once. Unknown ids are skipped.
    async fn find_many(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>>;

    /// List categories passing `filter`, sorted by name.
    async fn list(&self, filter: &CategoryFilter) -> AppResult<Vec<Category>>;

    /// Count categories naming `id` as their parent.
    async fn count_children(&self, id: &CategoryId) -> AppResult<u64>;

    /// Count active categories.
    async fn count_active(&self) -> AppResult<u64>;

    /// Delete the category only if no other category names it as parent.
    ///
    /// The child check and the removal happen atomically.
    async fn delete_if_childless(&self, id: &CategoryId) -> AppResult<DeleteOutcome>;
}

/// Product persistence.
///
/// `create` and `update` recompute derived fields and verify the
/// moderation/availability pairing before writing, so every stored
/// document satisfies the catalog invariants.
#[async_trait]
pub trait ProductRepository: Repository<Product, ProductId> {
    /// Find a product by slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>>;

    /// Find a product by SKU.
    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>>;

    /// Whether any product already holds `sku`.
    async fn sku_exists(&self, sku: &str) -> AppResult<bool>;

    /// Fetch one page of products matching the query, in query order.
    async fn find_page(&self, query: &ProductQuery) -> AppResult<Vec<Product>>;

    /// Count every product matching the query's predicate, ignoring paging.
    async fn count_matching(&self, query: &ProductQuery) -> AppResult<u64>;

    /// Restamp the denormalized category name on every product in a
    /// category. Returns the number of products changed.
    async fn restamp_category_name(&self, category_id: &CategoryId, name: &str) -> AppResult<u64>;
}

/// Bring a product document into its storable form.
pub(crate) fn prepare_for_save(product: &Product) -> AppResult<Product> {
    let mut doc = product.clone();
    doc.validate()?;
    doc.recompute_derived(Utc::now());
    doc.ensure_consistent()?;
    Ok(doc)
}
