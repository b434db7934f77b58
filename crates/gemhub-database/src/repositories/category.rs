//! PostgreSQL category repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use gemhub_core::error::{AppError, ErrorKind};
use gemhub_core::result::AppResult;
use gemhub_core::traits::Repository;
use gemhub_core::traits::asset_store::StoredAsset;
use gemhub_core::types::CategoryId;
use gemhub_entity::category::Category;

use super::{CategoryRepository, DeleteOutcome};
use crate::query::{CategoryFilter, ParentFilter};

const COLUMNS: &str = "id, name, slug, description, image, is_active, parent_id, \
                       meta_title, meta_description, created_at, updated_at";

/// Row shape of the `categories` table.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
    description: Option<String>,
    image: Option<Json<StoredAsset>>,
    is_active: bool,
    parent_id: Option<CategoryId>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image: row.image.map(|Json(asset)| asset),
            is_active: row.is_active,
            parent_id: row.parent_id,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Category repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> AppResult<Option<Category>> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE {column} = $1");
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Category::from))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, format!("Failed to find category by {column}"), e)
            })
    }
}

/// Translate constraint violations on write into caller-facing errors.
fn map_write_error(e: sqlx::Error, category: &Category, action: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("categories_name_key") => {
                return AppError::conflict(format!(
                    "Category name '{}' already exists",
                    category.name
                ));
            }
            Some("categories_slug_key") => {
                return AppError::conflict(format!(
                    "Category slug '{}' already exists",
                    category.slug
                ));
            }
            Some("categories_parent_id_fkey") => {
                return AppError::not_found("Parent category not found");
            }
            Some("categories_not_own_parent") => {
                return AppError::validation("A category cannot be its own parent");
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, format!("Failed to {action} category"), e)
}

#[async_trait]
impl Repository<Category, CategoryId> for PgCategoryRepository {
    async fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Category::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find category", e))
    }

    async fn create(&self, category: &Category) -> AppResult<Category> {
        let sql = format!(
            "INSERT INTO categories ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(category.image.as_ref().map(Json))
            .bind(category.is_active)
            .bind(category.parent_id)
            .bind(&category.meta_title)
            .bind(&category.meta_description)
            .bind(category.created_at)
            .bind(category.updated_at)
            .fetch_one(&self.pool)
            .await
            .map(Category::from)
            .map_err(|e| map_write_error(e, category, "create"))
    }

    async fn update(&self, category: &Category) -> AppResult<Category> {
        let sql = format!(
            "UPDATE categories SET name = $2, slug = $3, description = $4, image = $5, \
             is_active = $6, parent_id = $7, meta_title = $8, meta_description = $9, \
             updated_at = $10 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(category.image.as_ref().map(Json))
            .bind(category.is_active)
            .bind(category.parent_id)
            .bind(&category.meta_title)
            .bind(&category.meta_description)
            .bind(category.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, category, "update"))?
            .map(Category::from)
            .ok_or_else(|| AppError::not_found(format!("Category {} not found", category.id)))
    }

    async fn delete(&self, id: &CategoryId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("categories_parent_id_fkey") =>
                {
                    AppError::conflict("Category has child categories")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to delete category", e),
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count categories", e)
            })?;
        Ok(count as u64)
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        self.find_one("slug", slug).await
    }

    async fn find_many(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = ANY($1)");
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Category::from).collect())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load categories", e))
    }

    async fn list(&self, filter: &CategoryFilter) -> AppResult<Vec<Category>> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM categories WHERE TRUE"));
        if !filter.include_inactive {
            qb.push(" AND is_active");
        }
        match filter.parent {
            ParentFilter::Any => {}
            ParentFilter::TopLevel => {
                qb.push(" AND parent_id IS NULL");
            }
            ParentFilter::ChildrenOf(parent) => {
                qb.push(" AND parent_id = ");
                qb.push_bind(parent);
            }
        }
        qb.push(" ORDER BY name ASC");

        qb.build_query_as::<CategoryRow>()
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Category::from).collect())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list categories", e))
    }

    async fn count_children(&self, id: &CategoryId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count child categories", e)
            })?;
        Ok(count as u64)
    }

    async fn count_active(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE is_active")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count active categories", e)
            })?;
        Ok(count as u64)
    }

    async fn delete_if_childless(&self, id: &CategoryId) -> AppResult<DeleteOutcome> {
        // Both CTEs see the same snapshot, so `found` reflects the row
        // before the delete ran.
        let (found, deleted): (bool, bool) = sqlx::query_as(
            "WITH target AS (SELECT id FROM categories WHERE id = $1), \
                  removed AS ( \
                      DELETE FROM categories c WHERE c.id = $1 \
                      AND NOT EXISTS (SELECT 1 FROM categories ch WHERE ch.parent_id = $1) \
                      RETURNING c.id \
                  ) \
             SELECT EXISTS (SELECT 1 FROM target), EXISTS (SELECT 1 FROM removed)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("categories_parent_id_fkey") =>
            {
                AppError::conflict("Category has child categories")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to delete category", e),
        })?;

        Ok(match (found, deleted) {
            (_, true) => DeleteOutcome::Deleted,
            (true, false) => DeleteOutcome::HasChildren,
            (false, false) => DeleteOutcome::NotFound,
        })
    }
}
