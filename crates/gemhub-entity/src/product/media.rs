//! Media references embedded in product documents.

use serde::{Deserialize, Serialize};

catalog_enum! {
    /// Role of a product photo.
    ImageRole("image type") {
        /// Hero image.
        Main => "main",
        /// Daylight photo.
        Daylight => "daylight",
        /// Ultraviolet fluorescence photo.
        UvLight => "uv-light",
        /// Microscope photo.
        Microscope => "microscope",
        /// Photo of the certificate.
        Certificate => "certificate",
    }
}

catalog_enum! {
    /// Which media list an asset belongs to.
    MediaKind("file type") {
        /// `images`.
        Image => "image",
        /// `videos`.
        Video => "video",
        /// `certification.certificate_images`.
        Certificate => "certificate",
    }
}

impl MediaKind {
    /// Folder, under the upload prefix, that receives this kind of media.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Image => "products/images",
            Self::Video => "products/videos",
            Self::Certificate => "products/certificates",
        }
    }

    /// MIME family accepted for this kind.
    pub fn accepted_mime_prefix(&self) -> &'static str {
        match self {
            Self::Image | Self::Certificate => "image/",
            Self::Video => "video/",
        }
    }
}

/// A product photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Stored URL.
    pub url: String,
    /// Stored file name.
    pub filename: String,
    /// Alt text.
    pub alt: String,
    /// Role of the photo.
    #[serde(rename = "type")]
    pub role: ImageRole,
    /// Whether this is the primary photo.
    #[serde(default)]
    pub is_primary: bool,
    /// Display order.
    #[serde(default)]
    pub order: u32,
}

/// A product video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVideo {
    /// Stored URL.
    pub url: String,
    /// Stored file name.
    pub filename: String,
    /// Poster frame URL.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Caption.
    #[serde(default)]
    pub description: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// A certificate scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateImage {
    /// Stored URL.
    pub url: String,
    /// Stored file name.
    pub filename: String,
}
