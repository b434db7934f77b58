//! PostgreSQL product repository.
//!
//! The full document is stored as JSONB; projection columns mirror the
//! whitelisted [`ProductField`]s so filters and sorts run on indexed
//! columns. Column names come only from [`column`], never from input.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryScalar;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use gemhub_core::error::{AppError, ErrorKind};
use gemhub_core::result::AppResult;
use gemhub_core::traits::Repository;
use gemhub_core::types::{CategoryId, FilterField, FilterOp, FilterValue, ProductId, SortDirection};
use gemhub_entity::product::{Product, ProductField};

use super::{ProductRepository, prepare_for_save};
use crate::query::ProductQuery;

/// SQL type family of a projection column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Bool,
    Uuid,
    Number,
    Time,
    TextList,
}

/// Map a whitelisted field to its projection column.
fn column(field: ProductField) -> (&'static str, ColumnKind) {
    use ColumnKind::*;
    match field {
        ProductField::CreatedBy => ("created_by", Uuid),
        ProductField::Status => ("status", Text),
        ProductField::ModerationStatus => ("moderation_status", Text),
        ProductField::Shape => ("shape", Text),
        ProductField::ColorGrade => ("color_grade", Text),
        ProductField::OriginCountry => ("origin_country", Text),
        ProductField::Featured => ("featured", Bool),
        ProductField::FeaturedOrder => ("featured_order", Number),
        ProductField::Heated => ("heated", Bool),
        ProductField::Category => ("category_id", Uuid),
        ProductField::Name => ("name", Text),
        ProductField::Slug => ("slug", Text),
        ProductField::Sku => ("sku", Text),
        ProductField::ShortDescription => ("short_description", Text),
        ProductField::FullDescription => ("full_description", Text),
        ProductField::Tags => ("tags", TextList),
        ProductField::Carat => ("carat", Number),
        ProductField::PriceAmount => ("price_amount", Number),
        ProductField::PricePerCarat => ("price_per_carat", Number),
        ProductField::CreatedAt => ("created_at", Time),
        ProductField::UpdatedAt => ("updated_at", Time),
    }
}

/// Escape `%`, `_` and `\` so the needle matches literally inside ILIKE.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Render one condition. Combinations the in-memory evaluator treats as
/// non-matching render as `FALSE`.
fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, filter: &FilterField<ProductField>) {
    let (col, kind) = column(filter.field);
    match (kind, filter.op, &filter.value) {
        (ColumnKind::Text, FilterOp::Eq, FilterValue::String(v)) => {
            qb.push(col).push(" = ").push_bind(v.clone());
        }
        (ColumnKind::Text, FilterOp::Contains, FilterValue::String(v)) => {
            qb.push(col).push(" ILIKE ").push_bind(like_pattern(v));
        }
        (ColumnKind::Bool, FilterOp::Eq, FilterValue::Boolean(v)) => {
            qb.push(col).push(" = ").push_bind(*v);
        }
        (ColumnKind::Uuid, FilterOp::Eq, FilterValue::Uuid(v)) => {
            qb.push(col).push(" = ").push_bind(*v);
        }
        (ColumnKind::TextList, FilterOp::Eq, FilterValue::String(v)) => {
            qb.push_bind(v.clone()).push(" = ANY(").push(col).push(")");
        }
        (ColumnKind::TextList, FilterOp::Contains, FilterValue::String(v)) => {
            qb.push("EXISTS (SELECT 1 FROM unnest(")
                .push(col)
                .push(") AS tag WHERE tag ILIKE ")
                .push_bind(like_pattern(v))
                .push(")");
        }
        _ => {
            qb.push("FALSE");
        }
    }
}

/// Append the `WHERE` clause for a query's predicate.
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
    qb.push(" WHERE TRUE");
    for filter in &query.filters {
        qb.push(" AND ");
        push_condition(qb, filter);
    }
    if !query.any_of.is_empty() {
        qb.push(" AND (");
        for (i, filter) in query.any_of.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            push_condition(qb, filter);
        }
        qb.push(")");
    }
}

/// Append `ORDER BY`; missing values sort first ascending, last descending.
fn push_order(qb: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
    qb.push(" ORDER BY ");
    for key in query.sort.iter().filter(|k| k.field.is_sortable()) {
        let (col, _) = column(key.field);
        let nulls = match key.direction {
            SortDirection::Asc => "NULLS FIRST",
            SortDirection::Desc => "NULLS LAST",
        };
        qb.push(col)
            .push(" ")
            .push(key.direction.as_sql())
            .push(" ")
            .push(nulls)
            .push(", ");
    }
    qb.push("id ASC");
}

type DocumentQuery<'q> = QueryScalar<'q, Postgres, Json<Product>, PgArguments>;

/// Bind the id, every projection column and the document, in the
/// `$1..$23` order used by the insert and update statements.
fn bind_document<'q>(query: DocumentQuery<'q>, doc: &'q Product) -> DocumentQuery<'q> {
    query
        .bind(doc.id)
        .bind(&doc.name)
        .bind(&doc.slug)
        .bind(&doc.sku)
        .bind(doc.category_id)
        .bind(doc.created_by)
        .bind(doc.status.as_str())
        .bind(doc.moderation.status.as_str())
        .bind(doc.shape.as_str())
        .bind(doc.color.grade.as_str())
        .bind(doc.origin.country.as_str())
        .bind(doc.treatment.heated)
        .bind(doc.featured)
        .bind(doc.featured_order)
        .bind(doc.description.short.as_deref())
        .bind(doc.description.full.as_deref())
        .bind(&doc.tags)
        .bind(doc.carat)
        .bind(doc.price.amount)
        .bind(doc.price.price_per_carat)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .bind(Json(doc))
}

/// Translate unique-constraint violations into conflicts.
fn map_write_error(e: sqlx::Error, doc: &Product, action: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("products_slug_key") => {
                return AppError::conflict(format!("Product slug '{}' already exists", doc.slug));
            }
            Some("products_sku_key") => {
                return AppError::conflict(format!("Product SKU '{}' already exists", doc.sku));
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, format!("Failed to {action} product"), e)
}

/// Product repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> AppResult<Option<Product>> {
        let sql = format!("SELECT document FROM products WHERE {column} = $1");
        sqlx::query_scalar::<_, Json<Product>>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map(|doc| doc.map(|Json(p)| p))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, format!("Failed to find product by {column}"), e)
            })
    }
}

#[async_trait]
impl Repository<Product, ProductId> for PgProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        sqlx::query_scalar::<_, Json<Product>>("SELECT document FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|doc| doc.map(|Json(p)| p))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find product", e))
    }

    async fn create(&self, product: &Product) -> AppResult<Product> {
        let doc = prepare_for_save(product)?;
        let query = sqlx::query_scalar(
            "INSERT INTO products (id, name, slug, sku, category_id, created_by, status, \
             moderation_status, shape, color_grade, origin_country, heated, featured, \
             featured_order, short_description, full_description, tags, carat, price_amount, \
             price_per_carat, created_at, updated_at, document) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23) RETURNING document",
        );
        bind_document(query, &doc)
            .fetch_one(&self.pool)
            .await
            .map(|Json(p)| p)
            .map_err(|e| map_write_error(e, &doc, "create"))
    }

    async fn update(&self, product: &Product) -> AppResult<Product> {
        let doc = prepare_for_save(product)?;
        let query = sqlx::query_scalar(
            "UPDATE products SET name = $2, slug = $3, sku = $4, category_id = $5, \
             created_by = $6, status = $7, moderation_status = $8, shape = $9, \
             color_grade = $10, origin_country = $11, heated = $12, featured = $13, \
             featured_order = $14, short_description = $15, full_description = $16, \
             tags = $17, carat = $18, price_amount = $19, price_per_carat = $20, \
             created_at = $21, updated_at = $22, document = $23 \
             WHERE id = $1 RETURNING document",
        );
        bind_document(query, &doc)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &doc, "update"))?
            .map(|Json(p)| p)
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", doc.id)))
    }

    async fn delete(&self, id: &ProductId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete product", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count products", e))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        self.find_one("slug", slug).await
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        self.find_one("sku", sku).await
    }

    async fn sku_exists(&self, sku: &str) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE sku = $1)")
            .bind(sku)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check SKU", e))
    }

    async fn find_page(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT document FROM products");
        push_predicate(&mut qb, query);
        push_order(&mut qb, query);
        qb.push(" LIMIT ")
            .push_bind(i64::try_from(query.page.limit()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        qb.build_query_scalar::<Json<Product>>()
            .fetch_all(&self.pool)
            .await
            .map(|docs| docs.into_iter().map(|Json(p)| p).collect())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list products", e))
    }

    async fn count_matching(&self, query: &ProductQuery) -> AppResult<u64> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_predicate(&mut qb, query);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count products", e))?;
        Ok(count as u64)
    }

    async fn restamp_category_name(&self, category_id: &CategoryId, name: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE products \
             SET document = jsonb_set( \
                     jsonb_set(document, '{category_name}', to_jsonb($2::text)), \
                     '{updated_at}', to_jsonb($3::timestamptz)), \
                 updated_at = $3 \
             WHERE category_id = $1 AND document->>'category_name' IS DISTINCT FROM $2",
        )
        .bind(category_id)
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to restamp category name", e)
        })?;
        Ok(result.rows_affected())
    }
}
