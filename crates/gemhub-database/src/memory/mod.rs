//! In-memory repository implementations.
//!
//! Each store keeps its documents in a `tokio` `RwLock`-guarded map and
//! enforces the same uniqueness and hierarchy constraints the PostgreSQL
//! schema does. Conditional writes run under a single write lock.

pub mod category;
pub mod product;

pub use category::MemoryCategoryRepository;
pub use product::MemoryProductRepository;
