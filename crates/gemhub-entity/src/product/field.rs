//! Whitelisted product fields for filtering and sorting.
//!
//! Queries name fields through [`ProductField`] only, so no caller input
//! ever reaches a query as a raw column or path. In-memory evaluation
//! reads the same fields through [`Product::field_value`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use gemhub_core::error::AppError;
use gemhub_core::types::{FilterOp, FilterValue};

use super::model::Product;

/// A filterable or sortable product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    /// `created_by`.
    CreatedBy,
    /// Availability `status`.
    Status,
    /// `moderation.status`.
    ModerationStatus,
    /// `shape`.
    Shape,
    /// `color.grade`.
    ColorGrade,
    /// `origin.country`.
    OriginCountry,
    /// `featured`.
    Featured,
    /// `featured_order`.
    FeaturedOrder,
    /// `treatment.heated`.
    Heated,
    /// `category_id`.
    Category,
    /// `name`.
    Name,
    /// `slug`.
    Slug,
    /// `sku`.
    Sku,
    /// `description.short`.
    ShortDescription,
    /// `description.full`.
    FullDescription,
    /// `tags` (list-valued).
    Tags,
    /// `carat`.
    Carat,
    /// `price.amount`.
    PriceAmount,
    /// `price.price_per_carat`.
    PricePerCarat,
    /// `created_at`.
    CreatedAt,
    /// `updated_at`.
    UpdatedAt,
}

impl ProductField {
    /// Return the canonical field path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedBy => "created_by",
            Self::Status => "status",
            Self::ModerationStatus => "moderation.status",
            Self::Shape => "shape",
            Self::ColorGrade => "color.grade",
            Self::OriginCountry => "origin.country",
            Self::Featured => "featured",
            Self::FeaturedOrder => "featured_order",
            Self::Heated => "treatment.heated",
            Self::Category => "category_id",
            Self::Name => "name",
            Self::Slug => "slug",
            Self::Sku => "sku",
            Self::ShortDescription => "description.short",
            Self::FullDescription => "description.full",
            Self::Tags => "tags",
            Self::Carat => "carat",
            Self::PriceAmount => "price.amount",
            Self::PricePerCarat => "price.price_per_carat",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    /// Whether callers may sort on this field.
    pub fn is_sortable(&self) -> bool {
        !matches!(
            self,
            Self::Tags | Self::ShortDescription | Self::FullDescription | Self::CreatedBy
        )
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductField {
    type Err = AppError;

    /// Accepts the canonical path and the camelCase names used by
    /// storefront query strings (`createdAt`, `price.pricePerCarat`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "created_by" | "createdBy" => Self::CreatedBy,
            "status" => Self::Status,
            "moderation.status" | "moderationStatus" => Self::ModerationStatus,
            "shape" => Self::Shape,
            "color.grade" | "colorGrade" => Self::ColorGrade,
            "origin.country" | "origin" => Self::OriginCountry,
            "featured" => Self::Featured,
            "featured_order" | "featuredOrder" => Self::FeaturedOrder,
            "treatment.heated" | "heated" => Self::Heated,
            "category_id" | "category" => Self::Category,
            "name" => Self::Name,
            "slug" => Self::Slug,
            "sku" => Self::Sku,
            "description.short" => Self::ShortDescription,
            "description.full" => Self::FullDescription,
            "tags" => Self::Tags,
            "carat" => Self::Carat,
            "price.amount" | "price" => Self::PriceAmount,
            "price.price_per_carat" | "price.pricePerCarat" | "pricePerCarat" => {
                Self::PricePerCarat
            }
            "created_at" | "createdAt" => Self::CreatedAt,
            "updated_at" | "updatedAt" => Self::UpdatedAt,
            _ => return Err(AppError::validation(format!("Unknown product field: {s}"))),
        };
        Ok(field)
    }
}

/// A product field's value, borrowed from the document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Text value.
    Text(&'a str),
    /// Boolean value.
    Bool(bool),
    /// Identifier value.
    Id(Uuid),
    /// Numeric value.
    Number(f64),
    /// Timestamp value.
    Time(DateTime<Utc>),
    /// List of text values.
    TextList(&'a [String]),
    /// The field is unset on this document.
    Missing,
}

impl FieldValue<'_> {
    /// Evaluate a filter condition against this value.
    ///
    /// `Contains` is a case-insensitive substring test; on a list it holds
    /// when any element contains the needle. `Eq` on a list tests membership.
    pub fn matches(&self, op: FilterOp, expected: &FilterValue) -> bool {
        match (op, self, expected) {
            (FilterOp::Eq, Self::Text(actual), FilterValue::String(v)) => actual == v,
            (FilterOp::Eq, Self::Bool(actual), FilterValue::Boolean(v)) => actual == v,
            (FilterOp::Eq, Self::Id(actual), FilterValue::Uuid(v)) => actual == v,
            (FilterOp::Eq, Self::TextList(items), FilterValue::String(v)) => {
                items.iter().any(|item| item == v)
            }
            (FilterOp::Contains, Self::Text(actual), FilterValue::String(v)) => {
                contains_ci(actual, v)
            }
            (FilterOp::Contains, Self::TextList(items), FilterValue::String(v)) => {
                items.iter().any(|item| contains_ci(item, v))
            }
            _ => false,
        }
    }

    /// Total order used for in-memory sorting. Missing values sort first.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Less,
            (_, Self::Missing) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Id(a), Self::Id(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Product {
    /// Read a whitelisted field.
    pub fn field_value(&self, field: ProductField) -> FieldValue<'_> {
        match field {
            ProductField::CreatedBy => FieldValue::Id(self.created_by.into_uuid()),
            ProductField::Status => FieldValue::Text(self.status.as_str()),
            ProductField::ModerationStatus => FieldValue::Text(self.moderation.status.as_str()),
            ProductField::Shape => FieldValue::Text(self.shape.as_str()),
            ProductField::ColorGrade => FieldValue::Text(self.color.grade.as_str()),
            ProductField::OriginCountry => FieldValue::Text(self.origin.country.as_str()),
            ProductField::Featured => FieldValue::Bool(self.featured),
            ProductField::FeaturedOrder => self
                .featured_order
                .map_or(FieldValue::Missing, |o| FieldValue::Number(f64::from(o))),
            ProductField::Heated => FieldValue::Bool(self.treatment.heated),
            ProductField::Category => FieldValue::Id(self.category_id.into_uuid()),
            ProductField::Name => FieldValue::Text(&self.name),
            ProductField::Slug => FieldValue::Text(&self.slug),
            ProductField::Sku => FieldValue::Text(&self.sku),
            ProductField::ShortDescription => self
                .description
                .short
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            ProductField::FullDescription => self
                .description
                .full
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            ProductField::Tags => FieldValue::TextList(&self.tags),
            ProductField::Carat => FieldValue::Number(self.carat),
            ProductField::PriceAmount => FieldValue::Number(self.price.amount),
            ProductField::PricePerCarat => self
                .price
                .price_per_carat
                .map_or(FieldValue::Missing, FieldValue::Number),
            ProductField::CreatedAt => FieldValue::Time(self.created_at),
            ProductField::UpdatedAt => FieldValue::Time(self.updated_at),
        }
    }
}
