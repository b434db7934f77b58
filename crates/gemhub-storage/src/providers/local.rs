//! Local filesystem asset store.
//!
//! Files live under `{public_root}/{upload_prefix}/{folder}/` and are
//! addressed by the URL `/{upload_prefix}/{folder}/{filename}`, which a
//! static file server maps straight back onto the same path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use gemhub_core::config::StorageConfig;
use gemhub_core::error::{AppError, ErrorKind};
use gemhub_core::result::AppResult;
use gemhub_core::traits::asset_store::{AssetStore, AssetUpload, StoredAsset};

use crate::naming::{alt_text, clean_folder, clean_relative_path, effective_mime, unique_file_name};

/// Local filesystem asset store.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    /// Public web root.
    root: PathBuf,
    /// Directory under the root that receives uploads.
    upload_prefix: String,
}

impl LocalAssetStore {
    /// Create a store rooted at `public_root`, creating the upload
    /// directory if needed.
    pub async fn new(public_root: &str, upload_prefix: &str) -> AppResult<Self> {
        let root = PathBuf::from(public_root);
        let upload_prefix = clean_folder(upload_prefix)?;
        let upload_dir = root.join(&upload_prefix);
        fs::create_dir_all(&upload_dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", upload_dir.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            upload_prefix,
        })
    }

    /// Create a store from the storage section of the configuration.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        Self::new(&config.public_root, &config.upload_prefix).await
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    fn store_type(&self) -> &str {
        "local"
    }

    async fn store(&self, upload: &AssetUpload, folder: &str) -> AppResult<StoredAsset> {
        let folder = clean_folder(folder)?;
        let filename = unique_file_name(&upload.file_name);
        let relative = if folder.is_empty() {
            format!("{}/{filename}", self.upload_prefix)
        } else {
            format!("{}/{folder}/{filename}", self.upload_prefix)
        };

        let full_path = self.resolve(&relative);
        self.ensure_parent(&full_path).await?;
        fs::write(&full_path, &upload.data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write asset: {relative}"),
                e,
            )
        })?;

        debug!(path = %relative, bytes = upload.size(), "Stored asset");
        Ok(StoredAsset {
            url: format!("/{relative}"),
            filename,
            alt: alt_text(&upload.file_name),
            size_bytes: upload.size(),
            mime_type: effective_mime(&upload.content_type, &upload.file_name),
        })
    }

    async fn remove(&self, relative_path: &str) -> AppResult<bool> {
        let relative = clean_relative_path(relative_path)?;
        let full_path = self.resolve(&relative);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path = %relative, "Removed asset");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %relative, "Asset already absent");
                Ok(false)
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to remove asset: {relative}"),
                e,
            )),
        }
    }
}
