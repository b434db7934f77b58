//! Product use cases.
//!
//! Role rules: any operator creates products; only the creator or the top
//! role edits or deletes one; only the top role moderates. A non-top edit
//! of a reviewed product sends it back to review.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use gemhub_core::config::CatalogConfig;
use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::types::{CategoryId, Completion, ProductId};
use gemhub_database::repositories::{CategoryRepository, ProductRepository};
use gemhub_entity::category::Category;
use gemhub_entity::product::{
    AvailabilityStatus, Description, Features, MediaKind, Moderation, ModerationAction,
    ModerationStatus, Product,
};

use super::request::{
    CreateProductRequest, UpdateProductRequest, clean_tags, clean_text, required,
};
use crate::assets::AssetCoordinator;
use crate::catalog::MediaUrlResolver;
use crate::context::RequestContext;
use crate::identifier::{SkuGenerator, slugify};

/// Product lifecycle service.
#[derive(Clone)]
pub struct ProductService {
    /// Product repository.
    products: Arc<dyn ProductRepository>,
    /// Category repository, for name snapshots.
    categories: Arc<dyn CategoryRepository>,
    /// Asset coordinator.
    assets: Arc<AssetCoordinator>,
    /// SKU generator.
    skus: SkuGenerator,
    /// Media URL publication.
    urls: MediaUrlResolver,
    /// Catalog tunables.
    config: CatalogConfig,
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("skus", &self.skus)
            .finish()
    }
}

impl ProductService {
    /// Creates a new product service.
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        assets: Arc<AssetCoordinator>,
        urls: MediaUrlResolver,
        config: CatalogConfig,
    ) -> Self {
        Self {
            products,
            categories,
            assets,
            skus: SkuGenerator::new(&config),
            urls,
            config,
        }
    }

    /// Creates a product.
    ///
    /// Products created by the top role start approved and available;
    /// everyone else's start pending. Uploaded files are stored before
    /// the document and removed again if the document cannot be saved.
    pub async fn create(&self, ctx: &RequestContext, req: CreateProductRequest) -> AppResult<Product> {
        ctx.require_operator()?;

        let name = required(req.name.and_then(clean_text), "name")?;
        let category_id = required(req.category_id, "category")?;
        let shape = required(req.shape, "shape")?;
        let carat = required(req.carat, "carat")?;
        let color = required(req.color, "color")?;
        let clarity = required(req.clarity, "clarity")?;
        let cut = required(req.cut, "cut")?;
        let dimensions = required(req.dimensions, "dimensions")?;
        let origin = required(req.origin, "origin")?;
        let price = required(req.price, "price")?;

        let category = self.load_category(category_id).await?;
        let slug = product_slug(&name)?;
        if self.products.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict("A product with this name already exists"));
        }
        let sku = self.skus.generate(self.products.as_ref()).await?;

        let now = Utc::now();
        let (moderation, status) = if ctx.is_top_role() {
            (Moderation::approved(ctx.user_id, now), AvailabilityStatus::Available)
        } else {
            (Moderation::pending(), AvailabilityStatus::Pending)
        };

        let mut certification = req.certification.unwrap_or_default();
        certification.certificate_images.clear();

        let short = req.short_description.and_then(clean_text);
        let meta_title = req.meta_title.and_then(clean_text).or_else(|| Some(name.clone()));
        let meta_description = req
            .meta_description
            .and_then(clean_text)
            .or_else(|| short.clone());

        let mut product = Product {
            id: ProductId::new(),
            name,
            slug,
            sku,
            category_id,
            category_name: category.name,
            shape,
            carat,
            color,
            clarity,
            cut,
            dimensions,
            origin,
            treatment: req.treatment.unwrap_or_default(),
            certification,
            phenomenon_type: req.phenomenon_type.unwrap_or_default(),
            images: Vec::new(),
            videos: Vec::new(),
            price,
            buying_rate_to_mmk: req.buying_rate_to_mmk,
            status,
            reservation: None,
            moderation,
            features: Features::default(),
            tags: clean_tags(req.tags),
            description: Description {
                short,
                full: req.full_description.and_then(clean_text),
            },
            meta_title,
            meta_description,
            featured: req.featured,
            featured_order: req.featured_order,
            created_by: ctx.user_id,
            created_at: now,
            updated_at: now,
        };
        product.validate()?;

        let stored = self.assets.attach_all(&mut product, &req.media).await?;
        let created = match self.products.create(&product).await {
            Ok(created) => created,
            Err(e) => {
                self.assets.rollback(&stored).await;
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            product_id = %created.id,
            sku = %created.sku,
            moderation = %created.moderation.status,
            assets = stored.len(),
            "Product created"
        );
        Ok(self.publish(created))
    }

    /// Applies a partial update.
    ///
    /// New uploads are appended to the media lists. When the editor does
    /// not hold the top role and the product has been reviewed, the
    /// product returns to pending review.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        req: UpdateProductRequest,
    ) -> AppResult<Product> {
        ctx.require_operator()?;
        let mut product = self.load(id).await?;
        self.ensure_can_modify(ctx, &product, "edit")?;

        if let Some(raw) = req.name {
            let name = required(clean_text(raw), "name")?;
            if name != product.name {
                let slug = product_slug(&name)?;
                if slug != product.slug {
                    let taken = self.products.find_by_slug(&slug).await?;
                    if taken.is_some_and(|other| other.id != id) {
                        return Err(AppError::conflict("A product with this name already exists"));
                    }
                    product.slug = slug;
                }
                product.name = name;
            }
        }
        if let Some(category_id) = req.category_id {
            let category = self.load_category(category_id).await?;
            product.category_id = category.id;
            product.category_name = category.name;
        }
        if let Some(shape) = req.shape {
            product.shape = shape;
        }
        if let Some(carat) = req.carat {
            product.carat = carat;
        }
        if let Some(color) = req.color {
            product.color = color;
        }
        if let Some(clarity) = req.clarity {
            product.clarity = clarity;
        }
        if let Some(cut) = req.cut {
            product.cut = cut;
        }
        if let Some(dimensions) = req.dimensions {
            product.dimensions = dimensions;
        }
        if let Some(origin) = req.origin {
            product.origin = origin;
        }
        if let Some(price) = req.price {
            product.price = price;
        }
        if let Some(treatment) = req.treatment {
            product.treatment = treatment;
        }
        if let Some(mut certification) = req.certification {
            certification.certificate_images =
                std::mem::take(&mut product.certification.certificate_images);
            product.certification = certification;
        }
        if let Some(phenomenon) = req.phenomenon_type {
            product.phenomenon_type = phenomenon;
        }
        if let Some(rate) = req.buying_rate_to_mmk {
            product.buying_rate_to_mmk = Some(rate);
        }
        if let Some(tags) = req.tags {
            product.tags = clean_tags(tags);
        }
        if let Some(short) = req.short_description {
            product.description.short = clean_text(short);
        }
        if let Some(full) = req.full_description {
            product.description.full = clean_text(full);
        }
        if let Some(meta_title) = req.meta_title {
            product.meta_title = clean_text(meta_title);
        }
        if let Some(meta_description) = req.meta_description {
            product.meta_description = clean_text(meta_description);
        }
        if let Some(featured) = req.featured {
            product.featured = featured;
        }
        if let Some(order) = req.featured_order {
            product.featured_order = Some(order);
        }
        product.validate()?;

        let now = Utc::now();
        let stored = self.assets.attach_all(&mut product, &req.media).await?;
        let demoted = match resubmit_if_reviewed(ctx, &mut product, now) {
            Ok(demoted) => demoted,
            Err(e) => {
                self.assets.rollback(&stored).await;
                return Err(e);
            }
        };
        product.updated_at = now;

        let saved = match self.products.update(&product).await {
            Ok(saved) => saved,
            Err(e) => {
                self.assets.rollback(&stored).await;
                return Err(e);
            }
        };

        if demoted {
            info!(product_id = %id, user_id = %ctx.user_id, "Edited product returned to review");
        }
        info!(
            user_id = %ctx.user_id,
            product_id = %id,
            assets = stored.len(),
            "Product updated"
        );
        Ok(self.publish(saved))
    }

    /// Deletes a product and every media file it references.
    ///
    /// File removal is best effort: the document is deleted even when
    /// some files could not be removed, and each failure is returned as a
    /// warning.
    pub async fn delete(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Completion<()>> {
        ctx.require_operator()?;
        let product = self.load(id).await?;
        self.ensure_can_modify(ctx, &product, "delete")?;

        let warnings = self.assets.cascade(&product).await;
        if !self.products.delete(&id).await? {
            return Err(AppError::not_found(format!("Product {id} not found")));
        }

        if !warnings.is_empty() {
            warn!(
                product_id = %id,
                failed = warnings.len(),
                "Product deleted but some assets could not be removed"
            );
        }
        info!(user_id = %ctx.user_id, product_id = %id, sku = %product.sku, "Product deleted");
        Ok(Completion::with_warnings((), warnings))
    }

    /// Approves a product for sale.
    pub async fn approve(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Product> {
        ctx.require_top_role("approve products")?;
        let action = ModerationAction::Approve {
            approver: ctx.user_id,
        };
        self.moderate(ctx, id, action).await
    }

    /// Rejects a product. `reason` must not be blank.
    pub async fn reject(&self, ctx: &RequestContext, id: ProductId, reason: &str) -> AppResult<Product> {
        ctx.require_top_role("reject products")?;
        let action = ModerationAction::Reject {
            approver: ctx.user_id,
            reason: reason.to_string(),
        };
        self.moderate(ctx, id, action).await
    }

    /// Sends a product back to its operator for rework.
    pub async fn request_revision(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        note: Option<String>,
    ) -> AppResult<Product> {
        ctx.require_top_role("request revisions")?;
        let action = ModerationAction::RequestRevision {
            reviewer: ctx.user_id,
            note: note.and_then(clean_text),
        };
        self.moderate(ctx, id, action).await
    }

    /// Holds an available product for the caller's cart.
    ///
    /// `minutes` defaults to the configured reservation length.
    pub async fn reserve(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        cart_id: Option<String>,
        minutes: Option<i64>,
    ) -> AppResult<Product> {
        let now = Utc::now();
        let mut product = self.load(id).await?;
        product.recompute_derived(now);
        let minutes = minutes.unwrap_or(self.config.reservation_minutes);
        product.reserve(ctx.user_id, cart_id.and_then(clean_text), minutes, now)?;
        product.updated_at = now;

        let saved = self.products.update(&product).await?;
        info!(
            user_id = %ctx.user_id,
            product_id = %id,
            minutes,
            "Product reserved"
        );
        Ok(self.publish(saved))
    }

    /// Releases a reservation held by the caller (or any, for the top role).
    pub async fn release(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Product> {
        let now = Utc::now();
        let mut product = self.load(id).await?;
        product.recompute_derived(now);
        if let Some(reservation) = &product.reservation {
            if reservation.reserved_by != ctx.user_id && !ctx.is_top_role() {
                return Err(AppError::authorization(
                    "You can only release your own reservations",
                ));
            }
        }
        product.release_reservation()?;
        product.updated_at = now;

        let saved = self.products.update(&product).await?;
        info!(user_id = %ctx.user_id, product_id = %id, "Reservation released");
        Ok(self.publish(saved))
    }

    /// Overrides commercial availability.
    pub async fn set_availability(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        status: AvailabilityStatus,
    ) -> AppResult<Product> {
        ctx.require_top_role("change availability")?;
        let mut product = self.load(id).await?;
        let previous = product.status;
        product.set_availability(status)?;
        product.updated_at = Utc::now();

        let saved = self.products.update(&product).await?;
        info!(
            user_id = %ctx.user_id,
            product_id = %id,
            from = %previous,
            to = %status,
            "Availability changed"
        );
        Ok(self.publish(saved))
    }

    /// Gets a product for an operator allowed to manage it.
    pub async fn get(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Product> {
        ctx.require_operator()?;
        let product = self.load(id).await?;
        self.ensure_can_modify(ctx, &product, "view")?;
        Ok(self.publish(product))
    }

    /// Gets a product by SKU for the storefront.
    ///
    /// Only approved, available products are returned.
    pub async fn get_public_by_sku(&self, sku: &str) -> AppResult<Product> {
        let sku = sku.trim().to_uppercase();
        let not_found = || AppError::not_found(format!("Product {sku} not found"));
        let mut product = self
            .products
            .find_by_sku(&sku)
            .await?
            .ok_or_else(not_found)?;
        product.recompute_derived(Utc::now());
        if !product.is_public() {
            return Err(not_found());
        }
        Ok(self.publish(product))
    }

    /// Removes one media reference and its file.
    ///
    /// A URL the product does not reference changes nothing. Removing a
    /// reference counts as an edit for the review rule.
    pub async fn remove_media(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        kind: MediaKind,
        url: &str,
    ) -> AppResult<Completion<Product>> {
        ctx.require_operator()?;
        let mut product = self.load(id).await?;
        self.ensure_can_modify(ctx, &product, "edit")?;

        let detached = self.assets.detach(&mut product, kind, url).await;
        if !detached.value {
            return Ok(Completion::clean(self.publish(product)));
        }

        let now = Utc::now();
        let demoted = resubmit_if_reviewed(ctx, &mut product, now)?;
        product.updated_at = now;
        let saved = self.products.update(&product).await?;

        if demoted {
            info!(product_id = %id, user_id = %ctx.user_id, "Edited product returned to review");
        }
        if detached.is_partial() {
            warn!(product_id = %id, kind = %kind, "Reference removed but its file remains");
        }
        Ok(Completion::with_warnings(self.publish(saved), detached.warnings))
    }

    async fn moderate(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        action: ModerationAction,
    ) -> AppResult<Product> {
        let now = Utc::now();
        let mut product = self.load(id).await?;
        let previous = product.moderation.status;
        product.apply_moderation(&action, now)?;
        product.updated_at = now;

        let saved = self.products.update(&product).await?;
        info!(
            user_id = %ctx.user_id,
            product_id = %id,
            from = %previous,
            to = %saved.moderation.status,
            "Product moderated"
        );
        Ok(self.publish(saved))
    }

    async fn load(&self, id: ProductId) -> AppResult<Product> {
        self.products
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    async fn load_category(&self, id: CategoryId) -> AppResult<Category> {
        self.categories
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))
    }

    fn ensure_can_modify(&self, ctx: &RequestContext, product: &Product, verb: &str) -> AppResult<()> {
        if ctx.can_modify(product) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "You can only {verb} products you created"
            )))
        }
    }

    fn publish(&self, mut product: Product) -> Product {
        self.urls.publish_product(&mut product);
        product
    }
}

fn product_slug(name: &str) -> AppResult<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::validation(
            "Product name must contain at least one letter or digit",
        ));
    }
    Ok(slug)
}

/// Send a reviewed product back to pending when a non-top operator edits it.
fn resubmit_if_reviewed(
    ctx: &RequestContext,
    product: &mut Product,
    now: DateTime<Utc>,
) -> AppResult<bool> {
    if ctx.is_top_role() || product.moderation.status == ModerationStatus::Pending {
        return Ok(false);
    }
    product.apply_moderation(&ModerationAction::Resubmit, now)?;
    Ok(true)
}
