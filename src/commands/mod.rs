//! CLI command definitions and dispatch.

pub mod category;
pub mod migrate;
pub mod product;
pub mod stats;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::output::OutputFormat;
use gemhub_core::config::AppConfig;
use gemhub_core::error::AppError;
use gemhub_core::traits::AssetStore;
use gemhub_core::types::UserId;
use gemhub_database::DatabasePool;
use gemhub_database::repositories::{PgCategoryRepository, PgProductRepository};
use gemhub_entity::user::UserRole;
use gemhub_service::{
    AssetCoordinator, CatalogQueryBuilder, CatalogService, CategoryService, MediaUrlResolver,
    ProductService, RequestContext,
};
use gemhub_storage::LocalAssetStore;

/// GemHub ruby catalog administration
#[derive(Debug, Parser)]
#[command(name = "gemhub", version, about, long_about = None)]
pub struct Cli {
    /// Explicit configuration file (skips the environment overlays)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Configuration environment overlay (`config/{env}.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Operator identity to act as
    #[arg(long, global = true)]
    pub operator: Option<Uuid>,

    /// Role of the acting operator
    #[arg(long, global = true, default_value = "superadmin")]
    pub role: UserRole,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Category management
    Category(category::CategoryArgs),
    /// Product management and moderation
    Product(product::ProductArgs),
    /// Catalog dashboard counts
    Stats,
}

impl Cli {
    /// Load configuration from the explicit file or the layered sources
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        match &self.config {
            Some(path) => AppConfig::load_file(path),
            None => AppConfig::load(&self.env),
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let pool = DatabasePool::connect(&config.database).await?;

        let result = match pool.health_check().await {
            Ok(true) => self.dispatch(&pool, config).await,
            Ok(false) => Err(AppError::database("Database failed the health check")),
            Err(e) => Err(e),
        };
        pool.close().await;
        result
    }

    async fn dispatch(&self, pool: &DatabasePool, config: &AppConfig) -> Result<(), AppError> {
        if matches!(self.command, Commands::Migrate) {
            return migrate::execute(pool).await;
        }

        let ctx = self.context()?;
        let runtime = Runtime::open(pool, config).await?;
        match &self.command {
            Commands::Migrate => Ok(()),
            Commands::Category(args) => category::execute(args, &runtime, &ctx, self.format).await,
            Commands::Product(args) => product::execute(args, &runtime, &ctx, self.format).await,
            Commands::Stats => stats::execute(&runtime, &ctx, self.format).await,
        }
    }

    /// Build the request context for the acting operator
    fn context(&self) -> Result<RequestContext, AppError> {
        let operator = self
            .operator
            .ok_or_else(|| AppError::validation("--operator <UUID> is required for this command"))?;
        Ok(RequestContext::new(UserId::from_uuid(operator), self.role))
    }
}

/// Services wired over PostgreSQL and the local asset store.
pub struct Runtime {
    /// Listings and stats.
    pub catalog: CatalogService,
    /// Category management.
    pub categories: CategoryService,
    /// Product lifecycle.
    pub products: ProductService,
}

impl Runtime {
    /// Wire every service from configuration.
    pub async fn open(pool: &DatabasePool, config: &AppConfig) -> Result<Self, AppError> {
        let products = Arc::new(PgProductRepository::new(pool.pool().clone()));
        let categories = Arc::new(PgCategoryRepository::new(pool.pool().clone()));
        let store = Arc::new(LocalAssetStore::from_config(&config.storage).await?);
        tracing::debug!(store = store.store_type(), "Asset store ready");
        let urls = MediaUrlResolver::from_config(&config.storage);
        let assets = Arc::new(AssetCoordinator::new(store, &config.storage));

        Ok(Self {
            catalog: CatalogService::new(
                products.clone(),
                categories.clone(),
                CatalogQueryBuilder::new(&config.catalog),
                urls.clone(),
            ),
            categories: CategoryService::new(
                categories.clone(),
                products.clone(),
                assets.clone(),
                urls.clone(),
            ),
            products: ProductService::new(
                products,
                categories,
                assets,
                urls,
                config.catalog.clone(),
            ),
        })
    }
}

/// Ask for confirmation on the terminal
pub fn confirm(prompt: &str) -> Result<bool, AppError> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
