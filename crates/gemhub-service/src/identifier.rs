//! Slug and SKU generation.

use chrono::Utc;
use rand::Rng;
use tracing::warn;

use gemhub_core::config::CatalogConfig;
use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_database::repositories::ProductRepository;

/// Derive a URL-safe slug from a display name.
///
/// Lowercases and trims, drops everything except ASCII letters, digits,
/// underscores, hyphens and whitespace, then collapses each run of
/// whitespace, underscores and hyphens into one hyphen. Leading and
/// trailing hyphens are dropped.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;

    for c in lowered.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = true;
        } else if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        }
    }
    slug
}

/// Compose `PREFIX-######-###` from a millisecond clock and a random draw.
pub fn compose_sku(prefix: &str, millis: i64, random: u16) -> String {
    format!(
        "{prefix}-{:06}-{:03}",
        millis.rem_euclid(1_000_000),
        random % 1000
    )
}

/// Whether `sku` has the `PREFIX-######-###` shape.
pub fn is_valid_sku(prefix: &str, sku: &str) -> bool {
    let Some(rest) = sku.strip_prefix(prefix).and_then(|r| r.strip_prefix('-')) else {
        return false;
    };
    match rest.split_once('-') {
        Some((time, random)) => {
            time.len() == 6
                && random.len() == 3
                && time.chars().all(|c| c.is_ascii_digit())
                && random.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Draws SKUs until one is free, up to a bounded number of attempts.
///
/// The free-check is advisory; the repository's unique constraint is the
/// authoritative guard when two creates race.
#[derive(Debug, Clone)]
pub struct SkuGenerator {
    prefix: String,
    max_attempts: u32,
}

impl SkuGenerator {
    /// Creates a generator from catalog configuration.
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            prefix: config.sku_prefix.clone(),
            max_attempts: config.sku_max_attempts.max(1),
        }
    }

    /// Draw a candidate without checking for collisions.
    pub fn draw(&self) -> String {
        let random: u16 = rand::rng().random_range(0..1000);
        compose_sku(&self.prefix, Utc::now().timestamp_millis(), random)
    }

    /// Produce a SKU no stored product currently holds.
    pub async fn generate(&self, products: &dyn ProductRepository) -> AppResult<String> {
        self.generate_with(products, || self.draw()).await
    }

    /// Like [`generate`](Self::generate), drawing candidates from `draw`.
    pub async fn generate_with(
        &self,
        products: &dyn ProductRepository,
        mut draw: impl FnMut() -> String + Send,
    ) -> AppResult<String> {
        for attempt in 1..=self.max_attempts {
            let candidate = draw();
            if !products.sku_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!(sku = %candidate, attempt, "SKU collision, drawing again");
        }
        Err(AppError::conflict(format!(
            "Could not allocate a unique SKU after {} attempts",
            self.max_attempts
        )))
    }
}
