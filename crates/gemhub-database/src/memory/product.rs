//! In-memory product repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::traits::Repository;
use gemhub_core::types::{CategoryId, ProductId};
use gemhub_entity::product::Product;

use crate::query::ProductQuery;
use crate::repositories::{ProductRepository, prepare_for_save};

/// Product repository over a shared map.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductRepository {
    items: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl MemoryProductRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(items: &HashMap<ProductId, Product>, doc: &Product) -> AppResult<()> {
    for other in items.values().filter(|p| p.id != doc.id) {
        if other.slug == doc.slug {
            return Err(AppError::conflict(format!(
                "Product slug '{}' already exists",
                doc.slug
            )));
        }
        if other.sku == doc.sku {
            return Err(AppError::conflict(format!(
                "Product SKU '{}' already exists",
                doc.sku
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl Repository<Product, ProductId> for MemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn create(&self, product: &Product) -> AppResult<Product> {
        let doc = prepare_for_save(product)?;
        let mut items = self.items.write().await;
        if items.contains_key(&doc.id) {
            return Err(AppError::conflict(format!("Product {} already exists", doc.id)));
        }
        check_unique(&items, &doc)?;
        items.insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn update(&self, product: &Product) -> AppResult<Product> {
        let doc = prepare_for_save(product)?;
        let mut items = self.items.write().await;
        if !items.contains_key(&doc.id) {
            return Err(AppError::not_found(format!("Product {} not found", doc.id)));
        }
        check_unique(&items, &doc)?;
        items.insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn delete(&self, id: &ProductId) -> AppResult<bool> {
        Ok(self.items.write().await.remove(id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.items.read().await.len() as u64)
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        let items = self.items.read().await;
        Ok(items.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let items = self.items.read().await;
        Ok(items.values().find(|p| p.sku == sku).cloned())
    }

    async fn sku_exists(&self, sku: &str) -> AppResult<bool> {
        Ok(self.items.read().await.values().any(|p| p.sku == sku))
    }

    async fn find_page(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        let items = self.items.read().await;
        let mut matching: Vec<&Product> = items.values().filter(|p| query.matches(p)).collect();
        matching.sort_by(|a, b| query.compare(a, b));
        Ok(matching
            .into_iter()
            .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_matching(&self, query: &ProductQuery) -> AppResult<u64> {
        let items = self.items.read().await;
        Ok(items.values().filter(|p| query.matches(p)).count() as u64)
    }

    async fn restamp_category_name(&self, category_id: &CategoryId, name: &str) -> AppResult<u64> {
        let mut items = self.items.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for product in items
            .values_mut()
            .filter(|p| p.category_id == *category_id && p.category_name != name)
        {
            product.category_name = name.to_string();
            product.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }
}
