//! Shared domain types.
//!
//! These types are intentionally kept small, immutable and serializable so they can be:
//!
//! - produced fresh by every engine call
//! - exported to JSON/CSV by the batch tooling
//! - consumed by map/export front-ends without re-deriving any math

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::BoundingBox;

/// A coordinate axis exactly as it arrived from a scraped document or an operator.
///
/// Deserializes untagged: JSON numbers become `Number`, strings `Text`, `null` `Missing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Missing)
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(v) => write!(f, "{v}"),
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Missing => Ok(()),
        }
    }
}

/// Classification of a coordinate pair.
///
/// Only `Utm13`, `Utm14` and `LatLng` are terminal on success; the remaining
/// variants describe what the classifier believed before correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateKind {
    Utm13,
    Utm14,
    #[value(name = "latlng")]
    LatLng,
    Utm13Inverted,
    #[value(name = "latlng-inverted")]
    LatLngInverted,
    Mixed,
    UtmPotential,
    #[value(name = "latlng-potential")]
    LatLngPotential,
    Invalid,
    Unknown,
}

/// Projected vs. geographic. Decides which correction strategies apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFamily {
    Utm,
    LatLng,
}

impl CoordinateKind {
    pub const ALL: [CoordinateKind; 10] = [
        CoordinateKind::Utm13,
        CoordinateKind::Utm14,
        CoordinateKind::LatLng,
        CoordinateKind::Utm13Inverted,
        CoordinateKind::LatLngInverted,
        CoordinateKind::Mixed,
        CoordinateKind::UtmPotential,
        CoordinateKind::LatLngPotential,
        CoordinateKind::Invalid,
        CoordinateKind::Unknown,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            CoordinateKind::Utm13 => "UTM 13N",
            CoordinateKind::Utm14 => "UTM 14N",
            CoordinateKind::LatLng => "Lat/Lng",
            CoordinateKind::Utm13Inverted => "UTM 13N (axes swapped)",
            CoordinateKind::LatLngInverted => "Lat/Lng (axes swapped)",
            CoordinateKind::Mixed => "Mixed UTM + Lat/Lng",
            CoordinateKind::UtmPotential => "Possible UTM",
            CoordinateKind::LatLngPotential => "Possible Lat/Lng",
            CoordinateKind::Invalid => "Invalid",
            CoordinateKind::Unknown => "Unknown",
        }
    }

    /// Family used for correction. `None` for terminal failure kinds.
    pub fn family(self) -> Option<CoordinateFamily> {
        match self {
            CoordinateKind::Utm13
            | CoordinateKind::Utm14
            | CoordinateKind::Utm13Inverted
            | CoordinateKind::UtmPotential
            | CoordinateKind::Mixed => Some(CoordinateFamily::Utm),
            CoordinateKind::LatLng | CoordinateKind::LatLngInverted | CoordinateKind::LatLngPotential => {
                Some(CoordinateFamily::LatLng)
            }
            CoordinateKind::Invalid | CoordinateKind::Unknown => None,
        }
    }

    /// Base kind an inverted variant resolves to after an axis swap.
    pub fn uninverted(self) -> Option<CoordinateKind> {
        match self {
            CoordinateKind::Utm13Inverted => Some(CoordinateKind::Utm13),
            CoordinateKind::LatLngInverted => Some(CoordinateKind::LatLng),
            _ => None,
        }
    }

    /// Kinds a successful result may carry.
    pub fn is_terminal(self) -> bool {
        matches!(self, CoordinateKind::Utm13 | CoordinateKind::Utm14 | CoordinateKind::LatLng)
    }

    pub fn zone(self) -> Option<UtmZone> {
        match self {
            CoordinateKind::Utm13 => Some(UtmZone::Z13),
            CoordinateKind::Utm14 => Some(UtmZone::Z14),
            _ => None,
        }
    }
}

impl std::fmt::Display for CoordinateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// UTM zones covering the serviced region (northern hemisphere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtmZone {
    #[serde(rename = "13N")]
    Z13,
    #[serde(rename = "14N")]
    Z14,
}

impl UtmZone {
    pub fn number(self) -> u8 {
        match self {
            UtmZone::Z13 => 13,
            UtmZone::Z14 => 14,
        }
    }
}

/// A concrete `(x, y)` pair: easting/northing in metres or longitude/latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

impl Xy {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn swapped(self) -> Self {
        Self { x: self.y, y: self.x }
    }
}

/// Cleaned input. When both axes are present, both are finite.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPair {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl NormalizedPair {
    pub fn both(&self) -> Option<Xy> {
        Some(Xy::new(self.x?, self.y?))
    }
}

/// Geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisChecks {
    pub first_in_range: bool,
    pub second_in_range: bool,
}

/// Range check of a pair against one bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub axis_checks: AxisChecks,
    pub bounds_used: BoundingBox,
}

/// Named repair strategies, in the order the corrector tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStrategy {
    InversionSwap,
    DigitRepair,
    SignFlip,
    DecimalScale,
}

impl CorrectionStrategy {
    pub fn display_name(self) -> &'static str {
        match self {
            CorrectionStrategy::InversionSwap => "inversion swap",
            CorrectionStrategy::DigitRepair => "digit repair",
            CorrectionStrategy::SignFlip => "sign flip",
            CorrectionStrategy::DecimalScale => "decimal scale",
        }
    }
}

/// The engine's single output type.
///
/// On success `kind` is one of `Utm13`/`Utm14`/`LatLng`, `corrected` lies inside
/// that kind's bounding box and `geographic` is populated. For UTM kinds
/// `corrected` stays in projected (easting, northing) space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub success: bool,
    pub original: (RawValue, RawValue),
    pub normalized: NormalizedPair,
    /// `None` only when normalization failed.
    pub corrected: Option<Xy>,
    /// What the classifier proposed before any correction.
    pub classified_as: CoordinateKind,
    /// Resolved kind (equal to `classified_as` when nothing resolved).
    pub kind: CoordinateKind,
    pub was_corrected: bool,
    pub strategy: Option<CorrectionStrategy>,
    pub validation: ValidationOutcome,
    pub geographic: Option<GeoPoint>,
    pub error: Option<String>,
}

/// A batch row after processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub id: String,
    /// 1-based CSV line the row came from.
    pub line: usize,
    pub result: ProcessResult,
}

/// A full batch run's configuration as understood by the pipeline.
///
/// Derived from CLI flags plus `.env` defaults.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub id_col: Option<String>,
    pub x_col: String,
    pub y_col: String,
    /// Worker threads for the parallel map (`None` = rayon default).
    pub threads: Option<usize>,
}
