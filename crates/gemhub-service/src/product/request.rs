//! Input types for product writes.

use gemhub_core::error::AppError;
use gemhub_core::result::AppResult;
use gemhub_core::types::CategoryId;
use gemhub_entity::product::{
    Certification, Clarity, Color, Cut, Dimensions, Origin, PhenomenonType, Price, Shape,
    Treatment,
};

use crate::assets::MediaUploads;

/// Data for creating a product.
///
/// The grading groups are optional here so that a missing group is
/// reported as a validation error naming it.
#[derive(Debug, Clone, Default)]
pub struct CreateProductRequest {
    /// Display name.
    pub name: Option<String>,
    /// Category to file the product under.
    pub category_id: Option<CategoryId>,
    /// Cut outline.
    pub shape: Option<Shape>,
    /// Weight in carats.
    pub carat: Option<f64>,
    /// Colour grading.
    pub color: Option<Color>,
    /// Clarity grading.
    pub clarity: Option<Clarity>,
    /// Cut grading.
    pub cut: Option<Cut>,
    /// Measurements.
    pub dimensions: Option<Dimensions>,
    /// Provenance.
    pub origin: Option<Origin>,
    /// Pricing.
    pub price: Option<Price>,
    /// Enhancement disclosure (defaults to heated).
    pub treatment: Option<Treatment>,
    /// Laboratory certification. Certificate scans come from `media`.
    pub certification: Option<Certification>,
    /// Optical phenomenon.
    pub phenomenon_type: Option<PhenomenonType>,
    /// Exchange rate to MMK at purchase.
    pub buying_rate_to_mmk: Option<f64>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// One-line summary.
    pub short_description: Option<String>,
    /// Long-form text.
    pub full_description: Option<String>,
    /// SEO title (defaults to the name).
    pub meta_title: Option<String>,
    /// SEO description (defaults to the short description).
    pub meta_description: Option<String>,
    /// Promote on the storefront.
    pub featured: bool,
    /// Position among featured products.
    pub featured_order: Option<i32>,
    /// Files to attach.
    pub media: MediaUploads,
}

/// Data for a partial product update.
///
/// Absent fields are left untouched. A supplied group replaces the stored
/// group wholesale; nested groups are not merged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductRequest {
    /// New display name; the slug follows it.
    pub name: Option<String>,
    /// New category; the category name is restamped.
    pub category_id: Option<CategoryId>,
    /// New cut outline.
    pub shape: Option<Shape>,
    /// New weight.
    pub carat: Option<f64>,
    /// New colour grading.
    pub color: Option<Color>,
    /// New clarity grading.
    pub clarity: Option<Clarity>,
    /// New cut grading.
    pub cut: Option<Cut>,
    /// New measurements.
    pub dimensions: Option<Dimensions>,
    /// New provenance.
    pub origin: Option<Origin>,
    /// New pricing.
    pub price: Option<Price>,
    /// New treatment disclosure.
    pub treatment: Option<Treatment>,
    /// New certification. Stored certificate scans are kept.
    pub certification: Option<Certification>,
    /// New phenomenon.
    pub phenomenon_type: Option<PhenomenonType>,
    /// New buying rate.
    pub buying_rate_to_mmk: Option<f64>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// New summary (empty clears it).
    pub short_description: Option<String>,
    /// New long-form text (empty clears it).
    pub full_description: Option<String>,
    /// New SEO title (empty clears it).
    pub meta_title: Option<String>,
    /// New SEO description (empty clears it).
    pub meta_description: Option<String>,
    /// New featured flag.
    pub featured: Option<bool>,
    /// New featured position.
    pub featured_order: Option<i32>,
    /// Files to append. Existing media is never removed by an update.
    pub media: MediaUploads,
}

/// Unwrap a required group or report it by name.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::validation(format!("Missing required field: {field}")))
}

/// Trim a free-text value, mapping blank input to `None`.
pub(crate) fn clean_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trim tags and drop blanks and duplicates, keeping first-seen order.
pub(crate) fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !cleaned.iter().any(|t| t == tag) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}
