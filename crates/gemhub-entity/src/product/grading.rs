//! Grading attributes of a ruby: closed enumerations and the nested
//! records that group them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::media::CertificateImage;

catalog_enum! {
    /// Cut outline of the stone.
    Shape("shape") {
        /// Round brilliant.
        Round => "round",
        /// Oval.
        Oval => "oval",
        /// Cushion.
        Cushion => "cushion",
        /// Emerald step cut.
        Emerald => "emerald",
        /// Pear.
        Pear => "pear",
        /// Marquise.
        Marquise => "marquise",
        /// Heart.
        Heart => "heart",
        /// Princess.
        Princess => "princess",
        /// Domed cabochon.
        Cabochon => "cabochon",
    }
}

catalog_enum! {
    /// Trade colour grade.
    ColorGrade("color grade") {
        /// The premium Burmese red.
        PigeonBlood => "pigeon-blood",
        /// Vivid red.
        VividRed => "vivid-red",
        /// Deep red.
        DeepRed => "deep-red",
        /// Medium red.
        MediumRed => "medium-red",
        /// Pinkish red.
        PinkishRed => "pinkish-red",
        /// Purplish red.
        PurplishRed => "purplish-red",
        /// Orangish red.
        OrangishRed => "orangish-red",
    }
}

catalog_enum! {
    /// Colour saturation.
    Saturation("saturation") {
        /// Vivid.
        Vivid => "vivid",
        /// Strong.
        Strong => "strong",
        /// Medium.
        Medium => "medium",
        /// Weak.
        Weak => "weak",
        /// Pale.
        Pale => "pale",
    }
}

catalog_enum! {
    /// Colour tone.
    Tone("tone") {
        /// Light.
        Light => "light",
        /// Medium light.
        MediumLight => "medium-light",
        /// Medium.
        Medium => "medium",
        /// Medium dark.
        MediumDark => "medium-dark",
        /// Dark.
        Dark => "dark",
    }
}

catalog_enum! {
    /// Clarity grade.
    ClarityGrade("clarity grade") {
        /// Internally flawless.
        If => "IF",
        /// Very very slightly included (1).
        Vvs1 => "VVS1",
        /// Very very slightly included (2).
        Vvs2 => "VVS2",
        /// Very slightly included (1).
        Vs1 => "VS1",
        /// Very slightly included (2).
        Vs2 => "VS2",
        /// Slightly included (1).
        Si1 => "SI1",
        /// Slightly included (2).
        Si2 => "SI2",
        /// Included (1).
        I1 => "I1",
        /// Included (2).
        I2 => "I2",
        /// Included (3).
        I3 => "I3",
    }
}

catalog_enum! {
    /// Cut quality grade.
    CutGrade("cut grade") {
        /// Excellent.
        Excellent => "excellent",
        /// Very good.
        VeryGood => "very-good",
        /// Good.
        Good => "good",
        /// Fair.
        Fair => "fair",
        /// Poor.
        Poor => "poor",
    }
}

catalog_enum! {
    /// Country of origin.
    OriginCountry("country") {
        /// Myanmar (Burma).
        Myanmar => "Myanmar (Burma)",
        /// Mozambique.
        Mozambique => "Mozambique",
        /// Thailand.
        Thailand => "Thailand",
        /// Sri Lanka.
        SriLanka => "Sri Lanka",
        /// Madagascar.
        Madagascar => "Madagascar",
        /// Tanzania.
        Tanzania => "Tanzania",
        /// Vietnam.
        Vietnam => "Vietnam",
        /// Afghanistan.
        Afghanistan => "Afghanistan",
        /// Any other source.
        Other => "Other",
    }
}

catalog_enum! {
    /// Enhancement applied to the stone.
    TreatmentType("treatment type") {
        /// Untreated.
        None => "none",
        /// Heat only.
        Heated => "heated",
        /// Heat with flux residue.
        HeatedWithFlux => "heated-with-flux",
        /// Lead-glass filled.
        GlassFilled => "glass-filled",
        /// Surface diffusion.
        Diffused => "diffused",
        /// Dyed.
        Dyed => "dyed",
    }
}

impl Default for TreatmentType {
    fn default() -> Self {
        Self::Heated
    }
}

catalog_enum! {
    /// Gemmological laboratory that issued a certificate.
    CertificateLab("lab") {
        /// GRS.
        Grs => "GRS",
        /// GIA.
        Gia => "GIA",
        /// Gübelin.
        Gubelin => "Gubelin",
        /// AGL.
        Agl => "AGL",
        /// SSEF.
        Ssef => "SSEF",
        /// Lotus.
        Lotus => "Lotus",
        /// Another lab.
        Other => "Other",
        /// Explicitly no lab.
        None => "None",
    }
}

catalog_enum! {
    /// Optical phenomenon.
    PhenomenonType("phenomenon type") {
        /// No phenomenon.
        None => "none",
        /// Six-ray star.
        Star6Ray => "star-6-ray",
        /// Twelve-ray star.
        Star12Ray => "star-12-ray",
        /// Chatoyancy.
        CatsEye => "cats-eye",
    }
}

impl Default for PhenomenonType {
    fn default() -> Self {
        Self::None
    }
}

/// Colour grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Trade grade.
    pub grade: ColorGrade,
    /// Saturation.
    #[serde(default)]
    pub saturation: Option<Saturation>,
    /// Tone.
    #[serde(default)]
    pub tone: Option<Tone>,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
}

/// Clarity grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clarity {
    /// Grade.
    pub grade: ClarityGrade,
    /// Whether no inclusions are visible to the naked eye.
    #[serde(default)]
    pub eye_clean: bool,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
}

/// Cut grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    /// Grade.
    pub grade: CutGrade,
    /// Polish notes.
    #[serde(default)]
    pub polish: Option<String>,
    /// Symmetry notes.
    #[serde(default)]
    pub symmetry: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
}

/// Measurements in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length.
    pub length: f64,
    /// Width.
    pub width: f64,
    /// Depth.
    pub depth: f64,
    /// Length-to-width ratio. Derived on every save.
    #[serde(default)]
    pub ratio: Option<f64>,
}

/// Provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Country.
    pub country: OriginCountry,
    /// Region within the country.
    #[serde(default)]
    pub region: Option<String>,
    /// Mine name.
    #[serde(default)]
    pub mine: Option<String>,
}

/// Enhancement disclosure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    /// Whether the stone was heated.
    #[serde(default = "default_heated")]
    pub heated: bool,
    /// Kind of treatment.
    #[serde(default)]
    pub treatment_type: TreatmentType,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for Treatment {
    fn default() -> Self {
        Self {
            heated: true,
            treatment_type: TreatmentType::Heated,
            description: None,
        }
    }
}

fn default_heated() -> bool {
    true
}

/// Laboratory certification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    /// Whether a certificate exists.
    #[serde(default)]
    pub has_certificate: bool,
    /// Issuing lab.
    #[serde(default)]
    pub lab: Option<CertificateLab>,
    /// Certificate number.
    #[serde(default)]
    pub certificate_number: Option<String>,
    /// Issue date.
    #[serde(default)]
    pub certificate_date: Option<NaiveDate>,
    /// Scans of the certificate, in upload order.
    #[serde(default)]
    pub certificate_images: Vec<CertificateImage>,
}
