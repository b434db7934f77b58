//! Category entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gemhub_core::traits::asset_store::StoredAsset;
use gemhub_core::types::CategoryId;

/// A catalog category. Categories form a single-level hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name (unique).
    pub name: String,
    /// URL-safe identifier derived from the name (unique).
    pub slug: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Optional cover image.
    pub image: Option<StoredAsset>,
    /// Whether the category is shown on the storefront.
    pub is_active: bool,
    /// Parent category (None for top-level).
    pub parent_id: Option<CategoryId>,
    /// SEO title.
    pub meta_title: Option<String>,
    /// SEO description.
    pub meta_description: Option<String>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Check if this is a top-level category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Project the fields embedded in other documents' views.
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// The `{id, name, slug}` projection of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Slug.
    pub slug: String,
}

/// A category together with its resolved parent, as returned by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryView {
    /// The category document.
    #[serde(flatten)]
    pub category: Category,
    /// The parent's summary, when the category has one.
    pub parent: Option<CategorySummary>,
}
