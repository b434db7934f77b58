//! Catalog rule configuration.

use serde::{Deserialize, Serialize};

/// Tunables for identifiers, listings, and reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Fixed SKU prefix.
    #[serde(default = "default_sku_prefix")]
    pub sku_prefix: String,
    /// How many SKUs to draw before giving up with a conflict.
    #[serde(default = "default_sku_max_attempts")]
    pub sku_max_attempts: u32,
    /// Default page size for operator listings.
    #[serde(default = "default_admin_page_size")]
    pub admin_page_size: u64,
    /// Default page size for public listings.
    #[serde(default = "default_public_page_size")]
    pub public_page_size: u64,
    /// Default reservation hold in minutes.
    #[serde(default = "default_reservation_minutes")]
    pub reservation_minutes: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            sku_prefix: default_sku_prefix(),
            sku_max_attempts: default_sku_max_attempts(),
            admin_page_size: default_admin_page_size(),
            public_page_size: default_public_page_size(),
            reservation_minutes: default_reservation_minutes(),
        }
    }
}

fn default_sku_prefix() -> String {
    "RBY".to_string()
}

fn default_sku_max_attempts() -> u32 {
    10
}

fn default_admin_page_size() -> u64 {
    20
}

fn default_public_page_size() -> u64 {
    12
}

fn default_reservation_minutes() -> i64 {
    30
}
