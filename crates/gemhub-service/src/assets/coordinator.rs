//! Asset Lifecycle Coordinator.
//!
//! Attaching stores the file first and only then appends the reference,
//! so a document never names media that was not stored. Detaching and
//! cascading treat storage removal as best-effort: a failure is logged
//! and reported as a warning, and the document-level change still
//! applies.

use std::sync::Arc;

use tracing::{debug, info, warn};

use gemhub_core::config::StorageConfig;
use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::traits::asset_store::{AssetStore, AssetUpload, StoredAsset};
use gemhub_core::types::Completion;
use gemhub_entity::product::{CertificateImage, ImageRole, MediaKind, Product, ProductImage, ProductVideo};

use crate::catalog::MediaUrlResolver;

/// Folder, under the upload prefix, that receives category images.
pub const CATEGORY_FOLDER: &str = "categories";

/// Files received with a product create or update, grouped by media list.
#[derive(Debug, Clone, Default)]
pub struct MediaUploads {
    /// Photos.
    pub images: Vec<AssetUpload>,
    /// Videos.
    pub videos: Vec<AssetUpload>,
    /// Certificate scans.
    pub certificate_images: Vec<AssetUpload>,
}

impl MediaUploads {
    /// Whether no non-empty file was supplied.
    pub fn is_empty(&self) -> bool {
        self.batches()
            .iter()
            .all(|(_, files)| files.iter().all(AssetUpload::is_empty))
    }

    fn batches(&self) -> [(MediaKind, &[AssetUpload]); 3] {
        [
            (MediaKind::Image, self.images.as_slice()),
            (MediaKind::Video, self.videos.as_slice()),
            (MediaKind::Certificate, self.certificate_images.as_slice()),
        ]
    }
}

/// Coordinates the asset store with media references in documents.
#[derive(Debug, Clone)]
pub struct AssetCoordinator {
    /// Backing asset store.
    store: Arc<dyn AssetStore>,
    /// Resolves caller-supplied URLs to store paths.
    urls: MediaUrlResolver,
    /// Upload size limit.
    max_upload_size_bytes: u64,
}

impl AssetCoordinator {
    /// Creates a new coordinator.
    pub fn new(store: Arc<dyn AssetStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            urls: MediaUrlResolver::from_config(config),
            max_upload_size_bytes: config.max_upload_size_bytes,
        }
    }

    /// Reject uploads that are too large or of the wrong MIME family.
    pub fn check_upload(&self, upload: &AssetUpload, accepted_prefix: &str) -> AppResult<()> {
        if upload.size() > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File '{}' exceeds maximum upload size of {} bytes",
                upload.file_name, self.max_upload_size_bytes
            )));
        }
        if !upload
            .content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with(accepted_prefix)
        {
            return Err(AppError::validation(format!(
                "File '{}' has type '{}', expected {}*",
                upload.file_name, upload.content_type, accepted_prefix
            )));
        }
        Ok(())
    }

    /// Store a category cover image.
    pub async fn store_category_image(&self, upload: &AssetUpload) -> AppResult<StoredAsset> {
        self.check_upload(upload, "image/")?;
        self.store.store(upload, CATEGORY_FOLDER).await
    }

    /// Store one file and append its reference to the `kind` list.
    ///
    /// The first image of a product without a primary photo becomes the
    /// primary `main` image; later images default to `daylight`. `role`
    /// overrides the default image role.
    pub async fn attach(
        &self,
        product: &mut Product,
        kind: MediaKind,
        upload: &AssetUpload,
        role: Option<ImageRole>,
    ) -> AppResult<StoredAsset> {
        self.check_upload(upload, kind.accepted_mime_prefix())?;
        let stored = self.store.store(upload, kind.folder()).await?;

        match kind {
            MediaKind::Image => {
                let is_primary = !product.images.iter().any(|i| i.is_primary);
                let default_role = if is_primary {
                    ImageRole::Main
                } else {
                    ImageRole::Daylight
                };
                product.images.push(ProductImage {
                    url: stored.url.clone(),
                    filename: stored.filename.clone(),
                    alt: stored.alt.clone(),
                    role: role.unwrap_or(default_role),
                    is_primary,
                    order: product.images.len() as u32,
                });
            }
            MediaKind::Video => product.videos.push(ProductVideo {
                url: stored.url.clone(),
                filename: stored.filename.clone(),
                thumbnail: None,
                description: None,
                duration: None,
            }),
            MediaKind::Certificate => {
                product
                    .certification
                    .certificate_images
                    .push(CertificateImage {
                        url: stored.url.clone(),
                        filename: stored.filename.clone(),
                    })
            }
        }

        debug!(product_id = %product.id, kind = %kind, url = %stored.url, "Attached asset");
        Ok(stored)
    }

    /// Attach every non-empty upload, all or nothing.
    ///
    /// All files are checked before any is stored. If storing one fails,
    /// the files stored so far are removed again and `product` is left
    /// untouched.
    pub async fn attach_all(
        &self,
        product: &mut Product,
        uploads: &MediaUploads,
    ) -> AppResult<Vec<StoredAsset>> {
        for (kind, files) in uploads.batches() {
            for upload in files.iter().filter(|u| !u.is_empty()) {
                self.check_upload(upload, kind.accepted_mime_prefix())?;
            }
        }

        let mut working = product.clone();
        let mut stored = Vec::new();
        for (kind, files) in uploads.batches() {
            for upload in files.iter().filter(|u| !u.is_empty()) {
                match self.attach(&mut working, kind, upload, None).await {
                    Ok(asset) => stored.push(asset),
                    Err(e) => {
                        self.rollback(&stored).await;
                        return Err(e);
                    }
                }
            }
        }

        *product = working;
        Ok(stored)
    }

    /// Remove freshly stored files after the enclosing write failed.
    pub async fn rollback(&self, stored: &[StoredAsset]) {
        for asset in stored {
            if let Some(warning) = self.remove_best_effort(&asset.url).await {
                warn!(url = %asset.url, "Rollback left an orphaned asset: {warning}");
            }
        }
    }

    /// Detach the reference matching `url` from the `kind` list and remove
    /// its file.
    ///
    /// `url` may be absolute or root-relative. A reference that is not in
    /// the list makes this a no-op returning `false`. A failed file
    /// removal does not keep the reference; it is reported as a warning.
    pub async fn detach(&self, product: &mut Product, kind: MediaKind, url: &str) -> Completion<bool> {
        let relative = self.urls.to_relative(url);
        let stored_url = product
            .media_urls()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, u)| u)
            .find(|u| u == url || *u == relative);

        let Some(stored_url) = stored_url else {
            debug!(product_id = %product.id, kind = %kind, url, "No such asset reference");
            return Completion::clean(false);
        };

        let warnings = self
            .remove_best_effort(&stored_url)
            .await
            .into_iter()
            .collect();
        let removed = product.remove_media(kind, &stored_url);
        info!(product_id = %product.id, kind = %kind, url = %stored_url, "Detached asset");
        Completion::with_warnings(removed, warnings)
    }

    /// Remove every media file a product references.
    ///
    /// Never fails; returns one warning per file that could not be removed.
    pub async fn cascade(&self, product: &Product) -> Vec<String> {
        let mut warnings = Vec::new();
        for (_, url) in product.media_urls() {
            if let Some(warning) = self.remove_best_effort(&url).await {
                warnings.push(warning);
            }
        }
        warnings
    }

    /// Remove a file, propagating store failures.
    ///
    /// A file that is already gone is logged and reported as `Ok(false)`.
    pub async fn remove_strict(&self, url: &str) -> AppResult<bool> {
        let relative = self.urls.to_relative(url);
        let removed = self.store.remove(&relative).await?;
        if !removed {
            warn!(path = %relative, "Asset was already missing from the store");
        }
        Ok(removed)
    }

    /// Remove a file, turning a store failure into a warning message.
    pub async fn remove_best_effort(&self, url: &str) -> Option<String> {
        let relative = self.urls.to_relative(url);
        match self.store.remove(&relative).await {
            Ok(true) => None,
            Ok(false) => {
                warn!(path = %relative, "Asset was already missing from the store");
                None
            }
            Err(e) => {
                warn!(path = %relative, error = %e, "Failed to remove asset");
                Some(format!("Failed to remove asset {relative}: {}", e.message))
            }
        }
    }
}
