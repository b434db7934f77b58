//! Asset store configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded media lives and how its URLs are published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory served as the public web root. Stored URLs are relative
    /// to it (e.g. `/uploads/products/images/...`).
    #[serde(default = "default_public_root")]
    pub public_root: String,
    /// Sub-directory of the public root that receives uploads.
    #[serde(default = "default_upload_prefix")]
    pub upload_prefix: String,
    /// Base URL prefixed to relative media URLs on output.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum accepted upload size in bytes (default 10 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_root: default_public_root(),
            upload_prefix: default_upload_prefix(),
            base_url: default_base_url(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_public_root() -> String {
    "./public".to_string()
}

fn default_upload_prefix() -> String {
    "uploads".to_string()
}

fn default_base_url() -> String {
    "https://burma-rubies.com".to_string()
}

fn default_max_upload() -> u64 {
    10_485_760 // 10 MB
}
