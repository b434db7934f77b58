//! # gemhub-service
//!
//! Business logic service layer for GemHub. Each service orchestrates
//! repositories and the asset store to implement one catalog use case:
//! category management, the product lifecycle with its moderation
//! workflow, role-scoped catalog listings, and media bookkeeping.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references to the repository traits,
//! so the same services run over PostgreSQL or the in-memory stores.

pub mod assets;
pub mod catalog;
pub mod category;
pub mod context;
pub mod identifier;
pub mod product;

pub use assets::{AssetCoordinator, MediaUploads};
pub use catalog::{
    CatalogQueryBuilder, CatalogService, CatalogStats, MediaUrlResolver, OperatorListParams,
    PublicListParams,
};
pub use category::{CategoryService, CreateCategoryRequest, UpdateCategoryRequest};
pub use context::RequestContext;
pub use identifier::{SkuGenerator, slugify};
pub use product::{CreateProductRequest, ProductService, UpdateProductRequest};
