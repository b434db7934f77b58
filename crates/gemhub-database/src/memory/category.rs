//! In-memory category repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::traits::Repository;
use gemhub_core::types::CategoryId;
use gemhub_entity::category::Category;

use crate::query::CategoryFilter;
use crate::repositories::{CategoryRepository, DeleteOutcome};

/// Category repository over a shared map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCategoryRepository {
    items: Arc<RwLock<HashMap<CategoryId, Category>>>,
}

impl MemoryCategoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reject a write that would break name/slug uniqueness or the parent link.
fn check_constraints(items: &HashMap<CategoryId, Category>, category: &Category) -> AppResult<()> {
    for other in items.values().filter(|c| c.id != category.id) {
        if other.name == category.name {
            return Err(AppError::conflict(format!(
                "Category name '{}' already exists",
                category.name
            )));
        }
        if other.slug == category.slug {
            return Err(AppError::conflict(format!(
                "Category slug '{}' already exists",
                category.slug
            )));
        }
    }
    if let Some(parent) = category.parent_id {
        if parent == category.id {
            return Err(AppError::validation("A category cannot be its own parent"));
        }
        if !items.contains_key(&parent) {
            return Err(AppError::not_found("Parent category not found"));
        }
    }
    Ok(())
}

#[async_trait]
impl Repository<Category, CategoryId> for MemoryCategoryRepository {
    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn create(&self, category: &Category) -> AppResult<Category> {
        let mut items = self.items.write().await;
        if items.contains_key(&category.id) {
            return Err(AppError::conflict(format!(
                "Category {} already exists",
                category.id
            )));
        }
        check_constraints(&items, category)?;
        items.insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn update(&self, category: &Category) -> AppResult<Category> {
        let mut items = self.items.write().await;
        if !items.contains_key(&category.id) {
            return Err(AppError::not_found(format!(
                "Category {} not found",
                category.id
            )));
        }
        check_constraints(&items, category)?;
        items.insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn delete(&self, id: &CategoryId) -> AppResult<bool> {
        let mut items = self.items.write().await;
        if items.values().any(|c| c.parent_id == Some(*id)) {
            return Err(AppError::conflict("Category has child categories"));
        }
        Ok(items.remove(id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.items.read().await.len() as u64)
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let items = self.items.read().await;
        Ok(items.values().find(|c| c.slug == slug).cloned())
    }

    async fn find_many(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>> {
        let items = self.items.read().await;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn list(&self, filter: &CategoryFilter) -> AppResult<Vec<Category>> {
        let items = self.items.read().await;
        let mut found: Vec<Category> = items
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn count_children(&self, id: &CategoryId) -> AppResult<u64> {
        let items = self.items.read().await;
        Ok(items.values().filter(|c| c.parent_id == Some(*id)).count() as u64)
    }

    async fn count_active(&self) -> AppResult<u64> {
        let items = self.items.read().await;
        Ok(items.values().filter(|c| c.is_active).count() as u64)
    }

    async fn delete_if_childless(&self, id: &CategoryId) -> AppResult<DeleteOutcome> {
        let mut items = self.items.write().await;
        if !items.contains_key(id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if items.values().any(|c| c.parent_id == Some(*id)) {
            return Ok(DeleteOutcome::HasChildren);
        }
        items.remove(id);
        Ok(DeleteOutcome::Deleted)
    }
}
