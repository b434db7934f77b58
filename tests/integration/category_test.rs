//! Integration tests for category management.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use gemhub_core::config::StorageConfig;
use gemhub_core::error::ErrorKind;
use gemhub_core::result::AppResult;
use gemhub_core::traits::Repository;
use gemhub_core::traits::asset_store::AssetStore;
use gemhub_core::types::CategoryId;
use gemhub_database::memory::{MemoryCategoryRepository, MemoryProductRepository};
use gemhub_database::query::CategoryFilter;
use gemhub_database::repositories::{CategoryRepository, DeleteOutcome};
use gemhub_entity::category::Category;
use gemhub_service::{
    AssetCoordinator, CategoryService, CreateCategoryRequest, MediaUrlResolver,
    UpdateCategoryRequest,
};

use helpers::{FlakyAssetStore, TestApp, admin, buyer, image, relative, superadmin};

/// Category store where a subcategory is created concurrently with every
/// conditional delete.
#[derive(Debug, Clone, Default)]
struct ChildOnDelete {
    inner: MemoryCategoryRepository,
}

#[async_trait]
impl Repository<Category, CategoryId> for ChildOnDelete {
    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, entity: &Category) -> AppResult<Category> {
        self.inner.create(entity).await
    }

    async fn update(&self, entity: &Category) -> AppResult<Category> {
        self.inner.update(entity).await
    }

    async fn delete(&self, id: &CategoryId) -> AppResult<bool> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }
}

#[async_trait]
impl CategoryRepository for ChildOnDelete {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        self.inner.find_by_slug(slug).await
    }

    async fn find_many(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>> {
        self.inner.find_many(ids).await
    }

    async fn list(&self, filter: &CategoryFilter) -> AppResult<Vec<Category>> {
        self.inner.list(filter).await
    }

    async fn count_children(&self, id: &CategoryId) -> AppResult<u64> {
        self.inner.count_children(id).await
    }

    async fn count_active(&self) -> AppResult<u64> {
        self.inner.count_active().await
    }

    async fn delete_if_childless(&self, id: &CategoryId) -> AppResult<DeleteOutcome> {
        let now = Utc::now();
        let child = Category {
            id: CategoryId::new(),
            name: format!("Late Child {id}"),
            slug: format!("late-child-{id}"),
            description: None,
            image: None,
            is_active: true,
            parent_id: Some(*id),
            meta_title: None,
            meta_description: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.create(&child).await?;
        self.inner.delete_if_childless(id).await
    }
}

fn named(name: &str) -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: name.to_string(),
        ..CreateCategoryRequest::default()
    }
}

#[tokio::test]
async fn test_create_derives_slug() {
    let app = TestApp::new();
    let view = app
        .category_service
        .create(&admin(), named("  Star Rubies & Cabochons "))
        .await
        .unwrap();

    assert_eq!(view.category.name, "Star Rubies & Cabochons");
    assert_eq!(view.category.slug, "star-rubies-cabochons");
    assert!(view.category.is_active);
    assert!(view.parent.is_none());
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let app = TestApp::new();
    let ctx = admin();
    app.category_service.create(&ctx, named("Loose Rubies")).await.unwrap();

    let err = app
        .category_service
        .create(&ctx, named("loose   rubies"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.categories.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_buyer_cannot_create() {
    let app = TestApp::new();
    let err = app
        .category_service
        .create(&buyer(), named("Sneaky"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_delete_parent_with_children_conflicts() {
    let app = TestApp::new();
    let ctx = admin();
    let parent = app.category_service.create(&ctx, named("Jewelry")).await.unwrap();
    let child = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                parent_id: Some(parent.category.id),
                ..named("Rings")
            },
        )
        .await
        .unwrap();
    assert_eq!(child.parent.as_ref().map(|p| p.id), Some(parent.category.id));

    let err = app
        .category_service
        .delete(&ctx, parent.category.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let stored_parent = app.categories.find_by_id(&parent.category.id).await.unwrap();
    let stored_child = app.categories.find_by_id(&child.category.id).await.unwrap();
    assert_eq!(stored_parent, Some(parent.category.clone()));
    assert_eq!(stored_child, Some(child.category.clone()));

    app.category_service.delete(&ctx, child.category.id).await.unwrap();
    app.category_service.delete(&ctx, parent.category.id).await.unwrap();
    assert_eq!(app.categories.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_hierarchy_is_one_level_deep() {
    let app = TestApp::new();
    let ctx = admin();
    let top = app.category_service.create(&ctx, named("Jewelry")).await.unwrap();
    let mid = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                parent_id: Some(top.category.id),
                ..named("Rings")
            },
        )
        .await
        .unwrap();

    let err = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                parent_id: Some(mid.category.id),
                ..named("Solitaire Rings")
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let other = app.category_service.create(&ctx, named("Loose")).await.unwrap();
    let err = app
        .category_service
        .update(
            &ctx,
            top.category.id,
            UpdateCategoryRequest {
                parent_id: Some(other.category.id),
                ..UpdateCategoryRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .category_service
        .update(
            &ctx,
            other.category.id,
            UpdateCategoryRequest {
                parent_id: Some(other.category.id),
                ..UpdateCategoryRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_unknown_parent_is_not_found() {
    let app = TestApp::new();
    let err = app
        .category_service
        .create(
            &admin(),
            CreateCategoryRequest {
                parent_id: Some(gemhub_core::types::CategoryId::new()),
                ..named("Orphan")
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_removes_image_then_document() {
    let app = TestApp::new();
    let ctx = admin();
    let view = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                image: Some(image("cover.jpg")),
                ..named("Covered")
            },
        )
        .await
        .unwrap();
    let url = view.category.image.as_ref().map(|i| i.url.clone()).unwrap();
    assert!(url.starts_with("https://burma-rubies.com/uploads/categories/"));
    assert!(app.store.inner.contains(&relative(&url)).await);

    app.category_service.delete(&ctx, view.category.id).await.unwrap();
    assert!(app.store.inner.is_empty().await);
    assert_eq!(app.categories.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_image_store_failure_blocks_delete() {
    let app = TestApp::new();
    let ctx = admin();
    let view = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                image: Some(image("cover.jpg")),
                ..named("Guarded")
            },
        )
        .await
        .unwrap();
    app.store.fail_removes(true);

    let err = app
        .category_service
        .delete(&ctx, view.category.id)
        .await
        .unwrap_err();
    assert!(err.kind.is_dependency());
    assert!(app.categories.find_by_id(&view.category.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_missing_image_does_not_block_delete() {
    let app = TestApp::new();
    let ctx = admin();
    let view = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                image: Some(image("cover.jpg")),
                ..named("Vanishing")
            },
        )
        .await
        .unwrap();
    let url = view.category.image.as_ref().map(|i| i.url.clone()).unwrap();
    app.store.inner.remove(&relative(&url)).await.unwrap();

    app.category_service.delete(&ctx, view.category.id).await.unwrap();
    assert_eq!(app.categories.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_replace_and_remove_image() {
    let app = TestApp::new();
    let ctx = admin();
    let view = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                image: Some(image("old.jpg")),
                ..named("Refreshed")
            },
        )
        .await
        .unwrap();
    let old_url = view.category.image.as_ref().map(|i| i.url.clone()).unwrap();

    let done = app
        .category_service
        .update(
            &ctx,
            view.category.id,
            UpdateCategoryRequest {
                image: Some(image("new.jpg")),
                ..UpdateCategoryRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(!done.is_partial());
    let new_url = done.value.category.image.as_ref().map(|i| i.url.clone()).unwrap();
    assert_ne!(new_url, old_url);
    assert!(!app.store.inner.contains(&relative(&old_url)).await);
    assert!(app.store.inner.contains(&relative(&new_url)).await);

    let done = app
        .category_service
        .update(
            &ctx,
            view.category.id,
            UpdateCategoryRequest {
                remove_image: true,
                ..UpdateCategoryRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(done.value.category.image.is_none());
    assert!(app.store.inner.is_empty().await);
}

#[tokio::test]
async fn test_failed_old_image_removal_is_a_warning() {
    let app = TestApp::new();
    let ctx = admin();
    let view = app
        .category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                image: Some(image("old.jpg")),
                ..named("Sticky")
            },
        )
        .await
        .unwrap();
    app.store.fail_removes(true);

    let done = app
        .category_service
        .update(
            &ctx,
            view.category.id,
            UpdateCategoryRequest {
                remove_image: true,
                ..UpdateCategoryRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(done.is_partial());
    assert!(done.value.category.image.is_none());
}

#[tokio::test]
async fn test_rename_regenerates_slug_and_restamps_products() {
    let app = TestApp::new();
    let top = superadmin();
    let product = app.create_product(&top, "Restamped").await;
    app.category_service
        .create(&top, named("Taken Name"))
        .await
        .unwrap();

    let err = app
        .category_service
        .update(
            &top,
            product.category_id,
            UpdateCategoryRequest {
                name: Some("Taken  name".into()),
                ..UpdateCategoryRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let done = app
        .category_service
        .update(
            &top,
            product.category_id,
            UpdateCategoryRequest {
                name: Some("Burmese Classics".into()),
                ..UpdateCategoryRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.value.category.slug, "burmese-classics");

    let stored = app.products.find_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.category_name, "Burmese Classics");
}

#[tokio::test]
async fn test_listing_is_sorted_and_resolves_parents() {
    let app = TestApp::new();
    let ctx = admin();
    let parent = app.category_service.create(&ctx, named("Jewelry")).await.unwrap();
    app.category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                parent_id: Some(parent.category.id),
                ..named("Earrings")
            },
        )
        .await
        .unwrap();
    app.category_service
        .create(
            &ctx,
            CreateCategoryRequest {
                is_active: Some(false),
                ..named("Archive")
            },
        )
        .await
        .unwrap();

    let all = app
        .category_service
        .list(
            &ctx,
            &CategoryFilter {
                include_inactive: true,
                ..CategoryFilter::default()
            },
        )
        .await
        .unwrap();
    let names: Vec<&str> = all.iter().map(|v| v.category.name.as_str()).collect();
    assert_eq!(names, vec!["Archive", "Earrings", "Jewelry"]);
    assert_eq!(
        all[1].parent.as_ref().map(|p| p.slug.as_str()),
        Some("jewelry")
    );

    let public = app.category_service.list_public().await.unwrap();
    let names: Vec<&str> = public.iter().map(|v| v.category.name.as_str()).collect();
    assert_eq!(names, vec!["Earrings", "Jewelry"]);
}

#[tokio::test]
async fn test_child_created_during_delete_clears_removed_image() {
    let categories = Arc::new(ChildOnDelete::default());
    let store = FlakyAssetStore::default();
    let storage = StorageConfig::default();
    let service = CategoryService::new(
        categories.clone(),
        Arc::new(MemoryProductRepository::new()),
        Arc::new(AssetCoordinator::new(Arc::new(store.clone()), &storage)),
        MediaUrlResolver::from_config(&storage),
    );
    let ctx = admin();
    let view = service
        .create(
            &ctx,
            CreateCategoryRequest {
                name: "Contested".into(),
                image: Some(image("cover.jpg")),
                ..CreateCategoryRequest::default()
            },
        )
        .await
        .unwrap();

    let err = service.delete(&ctx, view.category.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.message.contains("cover image was already removed"));

    assert!(store.inner.is_empty().await);
    let kept = categories
        .find_by_id(&view.category.id)
        .await
        .unwrap()
        .unwrap();
    assert!(kept.image.is_none());
    assert_eq!(categories.count_children(&view.category.id).await.unwrap(), 1);
}
