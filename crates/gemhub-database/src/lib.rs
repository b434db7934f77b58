//! # gemhub-database
//!
//! PostgreSQL connection management, repository traits for catalog
//! documents, and two implementations of them: PostgreSQL for production
//! and an in-memory store for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod query;
pub mod repositories;

pub use connection::DatabasePool;
pub use query::{CategoryFilter, ParentFilter, ProductQuery};
pub use repositories::{CategoryRepository, DeleteOutcome, ProductRepository};
