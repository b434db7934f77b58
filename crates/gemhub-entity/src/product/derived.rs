//! Derived fields recomputed on every save.
//!
//! None of these values may be set by callers: any value supplied on input
//! is overwritten here before the document is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commerce::AvailabilityStatus;
use super::grading::{ColorGrade, OriginCountry};
use super::model::Product;

/// Boolean summary of the grading fields, used for cheap filtering and badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// `treatment.heated` is false.
    pub unheated: bool,
    /// Colour grade is pigeon-blood.
    pub pigeon_blood: bool,
    /// A certificate exists.
    pub certified: bool,
    /// Origin is Myanmar.
    pub burmese_origin: bool,
    /// Clarity is eye-clean.
    pub eye_clean: bool,
}

impl Features {
    /// Compute the flags from a product's authoritative fields.
    pub fn of(product: &Product) -> Self {
        Self {
            unheated: !product.treatment.heated,
            pigeon_blood: product.color.grade == ColorGrade::PigeonBlood,
            certified: product.certification.has_certificate,
            burmese_origin: product.origin.country == OriginCountry::Myanmar,
            eye_clean: product.clarity.eye_clean,
        }
    }
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Product {
    /// Recompute every derived field and drop a lapsed reservation.
    ///
    /// Idempotent: running it twice on the same document at the same
    /// instant changes nothing the second time.
    pub fn recompute_derived(&mut self, now: DateTime<Utc>) {
        self.price.price_per_carat = (self.carat > 0.0).then(|| round2(self.price.amount / self.carat));
        self.dimensions.ratio = (self.dimensions.width > 0.0)
            .then(|| round2(self.dimensions.length / self.dimensions.width));
        self.features = Features::of(self);

        let expired = self.status == AvailabilityStatus::Reserved
            && self
                .reservation
                .as_ref()
                .is_some_and(|r| r.is_expired(now));
        if expired {
            self.status = AvailabilityStatus::Available;
            self.reservation = None;
        }
    }
}
