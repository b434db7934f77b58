//! Shared test helpers for integration tests.
//!
//! Every test runs the real services over the in-memory repositories and
//! asset store, so no database is required.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use gemhub_core::config::{CatalogConfig, StorageConfig};
use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::traits::asset_store::{AssetStore, AssetUpload, StoredAsset};
use gemhub_core::types::{CategoryId, UserId};
use gemhub_database::memory::{MemoryCategoryRepository, MemoryProductRepository};
use gemhub_entity::category::CategoryView;
use gemhub_entity::product::{
    Clarity, ClarityGrade, Color, ColorGrade, Currency, Cut, CutGrade, Dimensions, Origin,
    OriginCountry, Price, Product, Shape, Treatment, TreatmentType,
};
use gemhub_entity::user::UserRole;
use gemhub_service::{
    AssetCoordinator, CatalogQueryBuilder, CatalogService, CategoryService,
    CreateCategoryRequest, CreateProductRequest, MediaUrlResolver, ProductService,
    RequestContext,
};
use gemhub_storage::MemoryAssetStore;

/// Asset store wrapper whose operations can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct FlakyAssetStore {
    /// The store that actually keeps the files.
    pub inner: MemoryAssetStore,
    fail_store: Arc<AtomicBool>,
    fail_remove: Arc<AtomicBool>,
}

impl FlakyAssetStore {
    /// Make every subsequent `store` call fail.
    pub fn fail_stores(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `remove` call fail.
    pub fn fail_removes(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetStore for FlakyAssetStore {
    fn store_type(&self) -> &str {
        "flaky"
    }

    async fn store(&self, upload: &AssetUpload, folder: &str) -> AppResult<StoredAsset> {
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(AppError::storage("Disk full"));
        }
        self.inner.store(upload, folder).await
    }

    async fn remove(&self, relative_path: &str) -> AppResult<bool> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(AppError::storage("Permission denied"));
        }
        self.inner.remove(relative_path).await
    }
}

/// Test application context
pub struct TestApp {
    /// Product repository, for direct inspection.
    pub products: Arc<MemoryProductRepository>,
    /// Category repository, for direct inspection.
    pub categories: Arc<MemoryCategoryRepository>,
    /// Asset store, for direct inspection and fault injection.
    pub store: FlakyAssetStore,
    /// Listing service.
    pub catalog: CatalogService,
    /// Category service.
    pub category_service: CategoryService,
    /// Product service.
    pub product_service: ProductService,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        let products = Arc::new(MemoryProductRepository::new());
        let categories = Arc::new(MemoryCategoryRepository::new());
        let store = FlakyAssetStore::default();
        let storage = StorageConfig::default();
        let catalog_config = CatalogConfig::default();
        let urls = MediaUrlResolver::from_config(&storage);
        let assets = Arc::new(AssetCoordinator::new(Arc::new(store.clone()), &storage));

        Self {
            catalog: CatalogService::new(
                products.clone(),
                categories.clone(),
                CatalogQueryBuilder::new(&catalog_config),
                urls.clone(),
            ),
            category_service: CategoryService::new(
                categories.clone(),
                products.clone(),
                assets.clone(),
                urls.clone(),
            ),
            product_service: ProductService::new(
                products.clone(),
                categories.clone(),
                assets,
                urls,
                catalog_config,
            ),
            products,
            categories,
            store,
        }
    }

    /// Create an active top-level category
    pub async fn create_category(&self, name: &str) -> CategoryView {
        self.category_service
            .create(
                &superadmin(),
                CreateCategoryRequest {
                    name: name.to_string(),
                    ..CreateCategoryRequest::default()
                },
            )
            .await
            .expect("Failed to create category")
    }

    /// Create a product as `ctx` in a fresh category
    pub async fn create_product(&self, ctx: &RequestContext, name: &str) -> Product {
        let category = self.create_category(&format!("{name} Category")).await;
        self.product_service
            .create(ctx, ruby_request(name, category.category.id))
            .await
            .expect("Failed to create product")
    }
}

/// An ordinary operator
pub fn admin() -> RequestContext {
    RequestContext::new(UserId::new(), UserRole::Admin)
}

/// A top-role operator
pub fn superadmin() -> RequestContext {
    RequestContext::new(UserId::new(), UserRole::SuperAdmin)
}

/// A storefront buyer
pub fn buyer() -> RequestContext {
    RequestContext::new(UserId::new(), UserRole::User)
}

/// A complete create request for a heated Thai oval
pub fn ruby_request(name: &str, category_id: CategoryId) -> CreateProductRequest {
    CreateProductRequest {
        name: Some(name.to_string()),
        category_id: Some(category_id),
        shape: Some(Shape::Oval),
        carat: Some(2.0),
        color: Some(Color {
            grade: ColorGrade::VividRed,
            saturation: None,
            tone: None,
            description: None,
        }),
        clarity: Some(Clarity {
            grade: ClarityGrade::Vs2,
            eye_clean: false,
            description: None,
        }),
        cut: Some(Cut {
            grade: CutGrade::VeryGood,
            polish: None,
            symmetry: None,
            description: None,
        }),
        dimensions: Some(Dimensions {
            length: 8.2,
            width: 6.1,
            depth: 4.0,
            ratio: None,
        }),
        origin: Some(Origin {
            country: OriginCountry::Thailand,
            region: None,
            mine: None,
        }),
        price: Some(Price {
            amount: 3000.0,
            currency: Currency::Usd,
            price_per_carat: None,
            compare_at_price: None,
        }),
        treatment: Some(Treatment {
            heated: true,
            treatment_type: TreatmentType::Heated,
            description: None,
        }),
        ..CreateProductRequest::default()
    }
}

/// An image upload
pub fn image(name: &str) -> AssetUpload {
    AssetUpload::new(name, "image/jpeg", Bytes::from_static(b"\xff\xd8\xff\xe0jpeg"))
}

/// A video upload
pub fn video(name: &str) -> AssetUpload {
    AssetUpload::new(name, "video/mp4", Bytes::from_static(b"\x00\x00\x00\x18ftyp"))
}

/// Strip the published base URL back to the stored relative path
pub fn relative(url: &str) -> String {
    MediaUrlResolver::from_config(&StorageConfig::default()).to_relative(url)
}
