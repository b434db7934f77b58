//! Product entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::types::{CategoryId, ProductId, UserId};

use super::commerce::{AvailabilityStatus, Price, Reservation};
use super::derived::Features;
use super::grading::{
    Certification, Clarity, ClarityGrade, Color, ColorGrade, Cut, Dimensions, Origin,
    OriginCountry, PhenomenonType, Shape, Treatment,
};
use super::media::{MediaKind, ProductImage, ProductVideo};
use super::moderation::{Moderation, ModerationAction, ModerationStatus};

/// Maximum length of the short description, in characters.
pub const SHORT_DESCRIPTION_MAX: usize = 200;

/// Smallest accepted carat weight.
pub const MIN_CARAT: f64 = 0.01;

/// Marketing copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    /// One-line summary.
    #[serde(default)]
    pub short: Option<String>,
    /// Long-form text.
    #[serde(default)]
    pub full: Option<String>,
}

/// A ruby listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL-safe identifier derived from the name (unique).
    pub slug: String,
    /// Human-facing catalog code (unique).
    pub sku: String,
    /// Assigned category.
    pub category_id: CategoryId,
    /// Snapshot of the category's name, restamped on every category write.
    pub category_name: String,
    /// Cut outline.
    pub shape: Shape,
    /// Weight in carats.
    pub carat: f64,
    /// Colour grading.
    pub color: Color,
    /// Clarity grading.
    pub clarity: Clarity,
    /// Cut grading.
    pub cut: Cut,
    /// Measurements.
    pub dimensions: Dimensions,
    /// Provenance.
    pub origin: Origin,
    /// Enhancement disclosure.
    pub treatment: Treatment,
    /// Laboratory certification.
    pub certification: Certification,
    /// Optical phenomenon.
    #[serde(default)]
    pub phenomenon_type: PhenomenonType,
    /// Photos, in display order.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Videos, in upload order.
    #[serde(default)]
    pub videos: Vec<ProductVideo>,
    /// Pricing.
    pub price: Price,
    /// Exchange rate to MMK at the time of purchase.
    #[serde(default)]
    pub buying_rate_to_mmk: Option<f64>,
    /// Commercial availability.
    pub status: AvailabilityStatus,
    /// Cart hold, present only while reserved.
    #[serde(default)]
    pub reservation: Option<Reservation>,
    /// Moderation record.
    pub moderation: Moderation,
    /// Summary flags derived from the grading fields.
    #[serde(default)]
    pub features: Features,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Marketing copy.
    #[serde(default)]
    pub description: Description,
    /// SEO title.
    #[serde(default)]
    pub meta_title: Option<String>,
    /// SEO description.
    #[serde(default)]
    pub meta_description: Option<String>,
    /// Whether the product is promoted on the storefront.
    #[serde(default)]
    pub featured: bool,
    /// Position among featured products.
    #[serde(default)]
    pub featured_order: Option<i32>,
    /// The operator who created the product. Never changes.
    pub created_by: UserId,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last saved.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Check field-level constraints that the type system cannot express.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if !self.carat.is_finite() || self.carat < MIN_CARAT {
            return Err(AppError::validation("Carat must be at least 0.01"));
        }
        if !self.price.amount.is_finite() || self.price.amount < 0.0 {
            return Err(AppError::validation("Price must be positive"));
        }
        if let Some(compare_at) = self.price.compare_at_price {
            if !compare_at.is_finite() || compare_at < 0.0 {
                return Err(AppError::validation("Compare-at price must be positive"));
            }
        }
        let dims = &self.dimensions;
        for (label, value) in [
            ("Length", dims.length),
            ("Width", dims.width),
            ("Depth", dims.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::validation(format!("{label} must be positive")));
            }
        }
        if let Some(short) = &self.description.short {
            if short.chars().count() > SHORT_DESCRIPTION_MAX {
                return Err(AppError::validation(
                    "Short description cannot exceed 200 characters",
                ));
            }
        }
        if let Some(rate) = self.buying_rate_to_mmk {
            if !rate.is_finite() || rate < 0.0 {
                return Err(AppError::validation("Buying rate must not be negative"));
            }
        }
        Ok(())
    }

    /// Check that moderation and availability form an allowed pair.
    pub fn ensure_consistent(&self) -> AppResult<()> {
        if !self.moderation.status.permits(self.status) {
            return Err(AppError::internal(format!(
                "Product {} has contradictory state: moderation {} with status {}",
                self.id, self.moderation.status, self.status
            )));
        }
        if self.status == AvailabilityStatus::Reserved && self.reservation.is_none() {
            return Err(AppError::internal(format!(
                "Product {} is reserved without a reservation",
                self.id
            )));
        }
        Ok(())
    }

    /// Whether buyers can see the product.
    pub fn is_public(&self) -> bool {
        self.status == AvailabilityStatus::Available
            && self.moderation.status == ModerationStatus::Approved
    }

    /// Whether `user` created this product.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.created_by == user
    }

    /// Premium badge: unheated Burmese pigeon-blood or vivid-red of high clarity.
    pub fn is_premium(&self) -> bool {
        self.features.unheated
            && self.origin.country == OriginCountry::Myanmar
            && matches!(
                self.color.grade,
                ColorGrade::PigeonBlood | ColorGrade::VividRed
            )
            && matches!(
                self.clarity.grade,
                ClarityGrade::If | ClarityGrade::Vvs1 | ClarityGrade::Vvs2 | ClarityGrade::Vs1
            )
    }

    /// Apply a moderation transition, setting moderation and availability together.
    pub fn apply_moderation(&mut self, action: &ModerationAction, at: DateTime<Utc>) -> AppResult<()> {
        let transition = self.moderation.transition(action, at)?;
        self.moderation = transition.moderation;
        self.status = transition.availability;
        self.reservation = None;
        Ok(())
    }

    /// Hold an approved, available product for a buyer's cart.
    pub fn reserve(
        &mut self,
        holder: UserId,
        cart_id: Option<String>,
        minutes: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if minutes <= 0 {
            return Err(AppError::validation("Reservation must last at least a minute"));
        }
        if !self.is_public() {
            return Err(AppError::conflict(format!(
                "Product {} is not available for reservation",
                self.sku
            )));
        }
        self.status = AvailabilityStatus::Reserved;
        self.reservation = Some(Reservation {
            reserved_by: holder,
            reserved_at: now,
            reserved_until: now + Duration::minutes(minutes),
            cart_id,
        });
        Ok(())
    }

    /// Release a cart hold and put the product back on sale.
    pub fn release_reservation(&mut self) -> AppResult<()> {
        if self.status != AvailabilityStatus::Reserved {
            return Err(AppError::conflict(format!(
                "Product {} is not reserved",
                self.sku
            )));
        }
        self.status = AvailabilityStatus::Available;
        self.reservation = None;
        Ok(())
    }

    /// Set availability directly, subject to the moderation pairing rules.
    pub fn set_availability(&mut self, status: AvailabilityStatus) -> AppResult<()> {
        if status == AvailabilityStatus::Reserved {
            return Err(AppError::validation(
                "Use a reservation to mark a product reserved",
            ));
        }
        if !self.moderation.status.permits(status) {
            return Err(AppError::conflict(format!(
                "Status {status} is not allowed while moderation is {}",
                self.moderation.status
            )));
        }
        self.status = status;
        self.reservation = None;
        Ok(())
    }

    /// Every stored media URL, across all three media lists.
    pub fn media_urls(&self) -> Vec<(MediaKind, String)> {
        let images = self
            .images
            .iter()
            .map(|i| (MediaKind::Image, i.url.clone()));
        let videos = self
            .videos
            .iter()
            .map(|v| (MediaKind::Video, v.url.clone()));
        let certificates = self
            .certification
            .certificate_images
            .iter()
            .map(|c| (MediaKind::Certificate, c.url.clone()));
        images.chain(videos).chain(certificates).collect()
    }

    /// Remove the reference with exactly `url` from the `kind` list.
    ///
    /// Returns `false` when no such reference existed.
    pub fn remove_media(&mut self, kind: MediaKind, url: &str) -> bool {
        match kind {
            MediaKind::Image => remove_by_url(&mut self.images, url, |i| &i.url),
            MediaKind::Video => remove_by_url(&mut self.videos, url, |v| &v.url),
            MediaKind::Certificate => remove_by_url(
                &mut self.certification.certificate_images,
                url,
                |c| &c.url,
            ),
        }
    }
}

fn remove_by_url<T>(list: &mut Vec<T>, url: &str, url_of: impl Fn(&T) -> &String) -> bool {
    let before = list.len();
    list.retain(|item| url_of(item) != url);
    list.len() != before
}
