//! Product domain entities.

pub mod commerce;
pub mod derived;
pub mod field;
pub mod grading;
pub mod media;
pub mod model;
pub mod moderation;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use commerce::{AvailabilityStatus, Currency, Price, Reservation};
pub use derived::{Features, round2};
pub use field::{FieldValue, ProductField};
pub use grading::{
    CertificateLab, Certification, Clarity, ClarityGrade, Color, ColorGrade, Cut, CutGrade,
    Dimensions, Origin, OriginCountry, PhenomenonType, Saturation, Shape, Tone, Treatment,
    TreatmentType,
};
pub use media::{CertificateImage, ImageRole, MediaKind, ProductImage, ProductVideo};
pub use model::{Description, Product};
pub use moderation::{Moderation, ModerationAction, ModerationStatus, Transition};
