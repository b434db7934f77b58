//! Catalog listings: role-scoped query construction, paginated listing,
//! and publication of media URLs.

pub mod media_url;
pub mod query;
pub mod service;

pub use media_url::MediaUrlResolver;
pub use query::{CatalogQueryBuilder, OperatorListParams, PublicListParams};
pub use service::{CatalogService, CatalogStats};
