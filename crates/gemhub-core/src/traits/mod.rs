//! Core traits defined in `gemhub-core` and implemented by other crates.

pub mod asset_store;
pub mod repository;

pub use asset_store::{AssetStore, AssetUpload, StoredAsset};
pub use repository::Repository;
