//! Sample documents for tests.

use chrono::Utc;

use gemhub_core::types::{CategoryId, ProductId, UserId};

use super::commerce::{AvailabilityStatus, Currency, Price};
use super::derived::Features;
use super::grading::{
    Certification, Clarity, ClarityGrade, Color, ColorGrade, Cut, CutGrade, Dimensions, Origin,
    OriginCountry, PhenomenonType, Shape, Treatment,
};
use super::model::{Description, Product};
use super::moderation::Moderation;

/// A pending, heated Mozambique oval.
pub fn sample_product() -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        name: "Oval Red Ruby".to_string(),
        slug: "oval-red-ruby".to_string(),
        sku: "RBY-123456-007".to_string(),
        category_id: CategoryId::new(),
        category_name: "Loose Rubies".to_string(),
        shape: Shape::Oval,
        carat: 2.0,
        color: Color {
            grade: ColorGrade::DeepRed,
            saturation: None,
            tone: None,
            description: None,
        },
        clarity: Clarity {
            grade: ClarityGrade::Vs2,
            eye_clean: false,
            description: None,
        },
        cut: Cut {
            grade: CutGrade::Good,
            polish: None,
            symmetry: None,
            description: None,
        },
        dimensions: Dimensions {
            length: 8.0,
            width: 6.0,
            depth: 4.0,
            ratio: None,
        },
        origin: Origin {
            country: OriginCountry::Mozambique,
            region: None,
            mine: None,
        },
        treatment: Treatment::default(),
        certification: Certification::default(),
        phenomenon_type: PhenomenonType::None,
        images: Vec::new(),
        videos: Vec::new(),
        price: Price {
            amount: 5000.0,
            currency: Currency::Usd,
            price_per_carat: None,
            compare_at_price: None,
        },
        buying_rate_to_mmk: None,
        status: AvailabilityStatus::Pending,
        reservation: None,
        moderation: Moderation::pending(),
        features: Features::default(),
        tags: vec!["oval".to_string()],
        description: Description::default(),
        meta_title: None,
        meta_description: None,
        featured: false,
        featured_order: None,
        created_by: UserId::new(),
        created_at: now,
        updated_at: now,
    }
}
