//! # gemhub-core
//!
//! Core crate for the GemHub ruby catalog. Contains the asset store
//! trait, the generic repository trait, configuration schemas, typed
//! identifiers, pagination/sorting/filter types, the transport-boundary
//! outcome envelope, and the unified error system.
//!
//! This crate has **no** internal dependencies on other GemHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
