//! Conversion between stored (root-relative) and published (absolute)
//! media URLs.

use gemhub_core::config::StorageConfig;
use gemhub_entity::category::Category;
use gemhub_entity::product::Product;

/// Publishes stored media URLs under a configured base URL.
#[derive(Debug, Clone)]
pub struct MediaUrlResolver {
    base_url: String,
}

impl MediaUrlResolver {
    /// Creates a resolver for `base_url` (a trailing slash is ignored).
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a resolver from storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.base_url)
    }

    /// Make a stored URL absolute. URLs already starting with `http` pass
    /// through unchanged.
    pub fn absolutize(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    /// Reduce an absolute or relative URL to its root-relative path
    /// (`/uploads/...`). Query strings and fragments are dropped.
    pub fn to_relative(&self, url: &str) -> String {
        let url = url.trim();
        let path = match url.split_once("://") {
            Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
            None => url,
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    }

    /// Absolutize every media URL of a product in place.
    pub fn publish_product(&self, product: &mut Product) {
        for image in &mut product.images {
            image.url = self.absolutize(&image.url);
        }
        for video in &mut product.videos {
            video.url = self.absolutize(&video.url);
            if let Some(thumbnail) = &video.thumbnail {
                video.thumbnail = Some(self.absolutize(thumbnail));
            }
        }
        for certificate in &mut product.certification.certificate_images {
            certificate.url = self.absolutize(&certificate.url);
        }
    }

    /// Absolutize the category's image URL in place.
    pub fn publish_category(&self, category: &mut Category) {
        if let Some(image) = &mut category.image {
            image.url = self.absolutize(&image.url);
        }
    }
}
