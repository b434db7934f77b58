//! In-memory asset store, used by tests and dry runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use gemhub_core::result::AppResult;
use gemhub_core::traits::asset_store::{AssetStore, AssetUpload, StoredAsset};

use crate::naming::{alt_text, clean_folder, clean_relative_path, effective_mime, unique_file_name};

/// Asset store that keeps file contents in a map keyed by relative path.
#[derive(Debug, Clone)]
pub struct MemoryAssetStore {
    upload_prefix: String,
    files: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryAssetStore {
    /// Create an empty store using the given upload prefix.
    pub fn new(upload_prefix: &str) -> Self {
        Self {
            upload_prefix: upload_prefix.trim_matches('/').to_string(),
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Whether a file exists at the URL or relative path.
    pub async fn contains(&self, path: &str) -> bool {
        let key = path.trim_start_matches('/');
        self.files.read().await.contains_key(key)
    }

    /// Number of stored files.
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    /// Whether the store holds no files.
    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

impl Default for MemoryAssetStore {
    fn default() -> Self {
        Self::new("uploads")
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    fn store_type(&self) -> &str {
        "memory"
    }

    async fn store(&self, upload: &AssetUpload, folder: &str) -> AppResult<StoredAsset> {
        let folder = clean_folder(folder)?;
        let filename = unique_file_name(&upload.file_name);
        let relative = if folder.is_empty() {
            format!("{}/{filename}", self.upload_prefix)
        } else {
            format!("{}/{folder}/{filename}", self.upload_prefix)
        };
        self.files
            .write()
            .await
            .insert(relative.clone(), upload.data.clone());
        Ok(StoredAsset {
            url: format!("/{relative}"),
            filename,
            alt: alt_text(&upload.file_name),
            size_bytes: upload.size(),
            mime_type: effective_mime(&upload.content_type, &upload.file_name),
        })
    }

    async fn remove(&self, relative_path: &str) -> AppResult<bool> {
        let key = clean_relative_path(relative_path)?;
        Ok(self.files.write().await.remove(&key).is_some())
    }
}
