//! Asset store trait for pluggable media backends.
//!
//! The catalog never assumes a physical storage technology. It hands an
//! upload and a logical folder to the store and gets back a stable URL
//! plus metadata; removal takes the URL's path relative to the public
//! root and reports whether anything was actually removed.

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A binary file received from the transport boundary.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    /// Original client-side file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl AssetUpload {
    /// Create a new upload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Size of the upload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the upload carries no bytes. Empty uploads are skipped.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reference to a stored asset, as returned by [`AssetStore::store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    /// URL relative to the public root (e.g. `/uploads/categories/x.png`).
    pub url: String,
    /// Unique stored file name.
    pub filename: String,
    /// Alt text seed derived from the original file name.
    pub alt: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type.
    pub mime_type: String,
}

/// Trait that all asset store backends must implement.
#[async_trait]
pub trait AssetStore: Send + Sync + Debug + 'static {
    /// Return the backend type identifier (e.g. "local", "memory").
    fn store_type(&self) -> &str;

    /// Persist an upload under the given logical folder.
    ///
    /// File names are made unique with a time and random component so two
    /// uploads of the same name never collide.
    async fn store(&self, upload: &AssetUpload, folder: &str) -> AppResult<StoredAsset>;

    /// Remove the file at a path relative to the public root.
    ///
    /// Returns `Ok(false)` when nothing existed at that path.
    async fn remove(&self, relative_path: &str) -> AppResult<bool>;
}
