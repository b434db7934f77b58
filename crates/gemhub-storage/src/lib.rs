//! # gemhub-storage
//!
//! Asset store implementations for GemHub. Uploaded media is written
//! under a public web root and addressed by URLs relative to it.

pub mod naming;
pub mod providers;

pub use providers::local::LocalAssetStore;
pub use providers::memory::MemoryAssetStore;
