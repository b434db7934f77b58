//! Category CRUD with slug uniqueness, the one-level hierarchy, and
//! cover image bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::traits::asset_store::AssetUpload;
use gemhub_core::types::{CategoryId, Completion};
use gemhub_database::query::CategoryFilter;
use gemhub_database::repositories::{CategoryRepository, DeleteOutcome, ProductRepository};
use gemhub_entity::category::{Category, CategoryView};

use crate::assets::AssetCoordinator;
use crate::catalog::MediaUrlResolver;
use crate::context::RequestContext;
use crate::identifier::slugify;

/// Data for creating a category.
#[derive(Debug, Clone, Default)]
pub struct CreateCategoryRequest {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Whether the category is shown (default `true`).
    pub is_active: Option<bool>,
    /// Parent category.
    pub parent_id: Option<CategoryId>,
    /// SEO title.
    pub meta_title: Option<String>,
    /// SEO description.
    pub meta_description: Option<String>,
    /// Cover image.
    pub image: Option<AssetUpload>,
}

/// Data for updating a category. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryRequest {
    /// New display name; the slug follows it.
    pub name: Option<String>,
    /// New description (empty clears it).
    pub description: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New parent category.
    pub parent_id: Option<CategoryId>,
    /// Make the category top-level.
    pub clear_parent: bool,
    /// New SEO title (empty clears it).
    pub meta_title: Option<String>,
    /// New SEO description (empty clears it).
    pub meta_description: Option<String>,
    /// Replacement cover image.
    pub image: Option<AssetUpload>,
    /// Drop the cover image.
    pub remove_image: bool,
}

/// Category use cases.
#[derive(Clone)]
pub struct CategoryService {
    /// Category repository.
    categories: Arc<dyn CategoryRepository>,
    /// Product repository, for category-name restamping.
    products: Arc<dyn ProductRepository>,
    /// Asset coordinator.
    assets: Arc<AssetCoordinator>,
    /// Media URL publication.
    urls: MediaUrlResolver,
}

impl std::fmt::Debug for CategoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryService").finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        assets: Arc<AssetCoordinator>,
        urls: MediaUrlResolver,
    ) -> Self {
        Self {
            categories,
            products,
            assets,
            urls,
        }
    }

    /// Lists categories for operators, sorted by name, with parents resolved.
    pub async fn list(&self, ctx: &RequestContext, filter: &CategoryFilter) -> AppResult<Vec<CategoryView>> {
        ctx.require_operator()?;
        let categories = self.categories.list(filter).await?;
        self.views(categories).await
    }

    /// Lists active categories for the storefront.
    pub async fn list_public(&self) -> AppResult<Vec<CategoryView>> {
        let categories = self.categories.list(&CategoryFilter::active()).await?;
        self.views(categories).await
    }

    /// Gets a single category.
    pub async fn get(&self, id: CategoryId) -> AppResult<CategoryView> {
        let category = self.load(id).await?;
        Ok(self.views(vec![category]).await?.remove(0))
    }

    /// Creates a category.
    pub async fn create(&self, ctx: &RequestContext, req: CreateCategoryRequest) -> AppResult<CategoryView> {
        ctx.require_operator()?;
        let (name, slug) = name_and_slug(&req.name)?;
        if self.categories.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict("Category with this name already exists"));
        }
        if let Some(parent_id) = req.parent_id {
            self.check_parent(None, parent_id).await?;
        }

        let image = match req.image.as_ref().filter(|u| !u.is_empty()) {
            Some(upload) => Some(self.assets.store_category_image(upload).await?),
            None => None,
        };

        let now = Utc::now();
        let category = Category {
            id: CategoryId::new(),
            name,
            slug,
            description: req.description.and_then(non_empty),
            image,
            is_active: req.is_active.unwrap_or(true),
            parent_id: req.parent_id,
            meta_title: req.meta_title.and_then(non_empty),
            meta_description: req.meta_description.and_then(non_empty),
            created_at: now,
            updated_at: now,
        };

        let created = match self.categories.create(&category).await {
            Ok(created) => created,
            Err(e) => {
                if let Some(image) = &category.image {
                    self.assets.rollback(std::slice::from_ref(image)).await;
                }
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            category_id = %created.id,
            slug = %created.slug,
            "Category created"
        );
        Ok(self.views(vec![created]).await?.remove(0))
    }

    /// Updates a category.
    ///
    /// A replaced or removed cover image is deleted from the store after
    /// the document is saved; a failed deletion is returned as a warning.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: CategoryId,
        req: UpdateCategoryRequest,
    ) -> AppResult<Completion<CategoryView>> {
        ctx.require_operator()?;
        let mut category = self.load(id).await?;

        let mut renamed = false;
        if let Some(raw_name) = &req.name {
            let (name, slug) = name_and_slug(raw_name)?;
            if name != category.name {
                if slug != category.slug {
                    let taken = self.categories.find_by_slug(&slug).await?;
                    if taken.is_some_and(|other| other.id != id) {
                        return Err(AppError::conflict("Category with this name already exists"));
                    }
                }
                category.name = name;
                category.slug = slug;
                renamed = true;
            }
        }
        if let Some(description) = req.description {
            category.description = non_empty(description);
        }
        if let Some(meta_title) = req.meta_title {
            category.meta_title = non_empty(meta_title);
        }
        if let Some(meta_description) = req.meta_description {
            category.meta_description = non_empty(meta_description);
        }
        if let Some(is_active) = req.is_active {
            category.is_active = is_active;
        }
        if req.clear_parent {
            category.parent_id = None;
        } else if let Some(parent_id) = req.parent_id {
            self.check_parent(Some(id), parent_id).await?;
            category.parent_id = Some(parent_id);
        }

        let mut fresh = None;
        let mut stale = None;
        if let Some(upload) = req.image.as_ref().filter(|u| !u.is_empty()) {
            let stored = self.assets.store_category_image(upload).await?;
            fresh = Some(stored.clone());
            stale = category.image.replace(stored);
        } else if req.remove_image {
            stale = category.image.take();
        }
        category.updated_at = Utc::now();

        let saved = match self.categories.update(&category).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(fresh) = &fresh {
                    self.assets.rollback(std::slice::from_ref(fresh)).await;
                }
                return Err(e);
            }
        };

        let mut warnings = Vec::new();
        if let Some(old) = stale {
            if let Some(warning) = self.assets.remove_best_effort(&old.url).await {
                warnings.push(warning);
            }
        }
        if renamed {
            match self.products.restamp_category_name(&id, &saved.name).await {
                Ok(changed) => info!(category_id = %id, changed, "Restamped category name"),
                Err(e) => {
                    warn!(category_id = %id, error = %e, "Failed to restamp category name");
                    warnings.push(format!("Products still show the old category name: {}", e.message));
                }
            }
        }

        info!(user_id = %ctx.user_id, category_id = %id, "Category updated");
        let view = self.views(vec![saved]).await?.remove(0);
        Ok(Completion::with_warnings(view, warnings))
    }

    /// Deletes a childless category and its cover image.
    ///
    /// The image is removed first; a store failure aborts the delete, but
    /// an image that is already gone does not block it. If the document
    /// then survives, its image reference is cleared and the returned
    /// error says so.
    pub async fn delete(&self, ctx: &RequestContext, id: CategoryId) -> AppResult<()> {
        ctx.require_operator()?;
        let category = self.load(id).await?;
        if self.categories.count_children(&id).await? > 0 {
            return Err(AppError::conflict(
                "Cannot delete a category that has subcategories",
            ));
        }

        if let Some(image) = &category.image {
            self.assets.remove_strict(&image.url).await?;
        }

        let err = match self.categories.delete_if_childless(&id).await {
            Ok(DeleteOutcome::Deleted) => {
                info!(user_id = %ctx.user_id, category_id = %id, "Category deleted");
                return Ok(());
            }
            Ok(DeleteOutcome::NotFound) => {
                return Err(AppError::not_found(format!("Category {id} not found")));
            }
            Ok(DeleteOutcome::HasChildren) => {
                warn!(category_id = %id, "Subcategory appeared during delete");
                AppError::conflict("Cannot delete a category that has subcategories")
            }
            Err(e) => e,
        };

        if category.image.is_some() {
            return Err(self.clear_removed_image(category, err).await);
        }
        Err(err)
    }

    /// Drop the reference to an image already removed from the store and
    /// fold the partial application into `err`.
    async fn clear_removed_image(&self, mut category: Category, err: AppError) -> AppError {
        let id = category.id;
        category.image = None;
        category.updated_at = Utc::now();
        let message = match self.categories.update(&category).await {
            Ok(_) => {
                warn!(category_id = %id, "Category kept after its cover image was removed");
                format!("{}; its cover image was already removed and has been cleared", err.message)
            }
            Err(save_err) => {
                warn!(
                    category_id = %id,
                    error = %save_err,
                    "Failed to clear removed cover image"
                );
                format!(
                    "{}; its cover image was already removed but the category still references it",
                    err.message
                )
            }
        };
        AppError { message, ..err }
    }

    async fn load(&self, id: CategoryId) -> AppResult<Category> {
        self.categories
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))
    }

    /// Enforce the one-level hierarchy for `child` (None when creating).
    async fn check_parent(&self, child: Option<CategoryId>, parent_id: CategoryId) -> AppResult<()> {
        if child == Some(parent_id) {
            return Err(AppError::validation("A category cannot be its own parent"));
        }
        let parent = self
            .categories
            .find_by_id(&parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent category not found"))?;
        if !parent.is_root() {
            return Err(AppError::validation(
                "Parent category must be a top-level category",
            ));
        }
        if let Some(child) = child {
            if self.categories.count_children(&child).await? > 0 {
                return Err(AppError::validation(
                    "A category with subcategories cannot be nested",
                ));
            }
        }
        Ok(())
    }

    /// Attach parent summaries and publish image URLs.
    async fn views(&self, categories: Vec<Category>) -> AppResult<Vec<CategoryView>> {
        let mut parent_ids: Vec<CategoryId> = categories.iter().filter_map(|c| c.parent_id).collect();
        parent_ids.sort_by_key(|id| id.into_uuid());
        parent_ids.dedup();
        let parents: HashMap<CategoryId, Category> = self
            .categories
            .find_many(&parent_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(categories
            .into_iter()
            .map(|mut category| {
                let parent = category
                    .parent_id
                    .and_then(|id| parents.get(&id))
                    .map(Category::summary);
                self.urls.publish_category(&mut category);
                CategoryView { category, parent }
            })
            .collect())
    }
}

/// Trim the name and derive its slug, rejecting names without any
/// slug-worthy character.
fn name_and_slug(raw: &str) -> AppResult<(String, String)> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::validation(
            "Category name must contain at least one letter or digit",
        ));
    }
    Ok((name.to_string(), slug))
}
