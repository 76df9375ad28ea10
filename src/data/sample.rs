//! Synthetic coordinate records with realistic scraping damage.
//!
//! Clean points are drawn around the centre of each region box with normal
//! jitter (clamped to the box), then damaged the way source documents damage
//! them: swapped columns, a shifted decimal point, a lost leading digit, an
//! extra OCR digit, a dropped minus sign, unit/label noise, or no value at all.
//!
//! Generation is deterministic for a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::domain::{BoundingBox, CoordinateKind, RawValue, Xy, bounds_for};
use crate::error::AppError;

/// Box widths are covered by roughly +/- 3 sigma.
const SIGMA_PER_WIDTH: f64 = 1.0 / 6.0;

/// Share of records that carry no usable coordinate at all.
const UNUSABLE_SHARE: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
}

/// How a generated record was damaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Damage {
    Clean,
    Swapped,
    ShiftedDecimal,
    DroppedLeadingDigit,
    SpuriousDigit,
    FlippedSign,
    NoisyText,
    Placeholder,
    Garbage,
}

impl Damage {
    /// Whether the engine is expected to restore the clean pair.
    pub fn recoverable(self) -> bool {
        !matches!(self, Damage::Placeholder | Damage::Garbage)
    }

    fn applicable(system: CoordinateKind) -> &'static [Damage] {
        match system {
            CoordinateKind::Utm13 => &[
                Damage::Clean,
                Damage::Swapped,
                Damage::ShiftedDecimal,
                Damage::DroppedLeadingDigit,
                Damage::SpuriousDigit,
                Damage::NoisyText,
            ],
            CoordinateKind::Utm14 => &[Damage::Clean, Damage::Swapped, Damage::ShiftedDecimal, Damage::NoisyText],
            _ => &[
                Damage::Clean,
                Damage::Swapped,
                Damage::ShiftedDecimal,
                Damage::FlippedSign,
                Damage::NoisyText,
            ],
        }
    }
}

/// One generated row: damaged text cells plus the ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub id: String,
    pub x: String,
    pub y: String,
    pub damage: Damage,
    /// Kind of the clean point.
    pub system: CoordinateKind,
    /// Clean pair, `None` for unrecoverable records.
    pub expected: Option<Xy>,
}

impl SampleRecord {
    pub fn raw_pair(&self) -> (RawValue, RawValue) {
        (RawValue::from(self.x.as_str()), RawValue::from(self.y.as_str()))
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<SampleRecord>, AppError> {
    if config.count == 0 {
        return Err(AppError::input("Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0).map_err(|e| AppError::internal(format!("Noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let id = format!("S-{:04}", i + 1);

        let roll: f64 = rng.r#gen();
        if roll < UNUSABLE_SHARE {
            let damage = if rng.gen_bool(0.5) { Damage::Placeholder } else { Damage::Garbage };
            let (x, y) = match damage {
                Damage::Placeholder => ("0".to_string(), "0".to_string()),
                _ => ("n/a".to_string(), String::new()),
            };
            records.push(SampleRecord {
                id,
                x,
                y,
                damage,
                system: CoordinateKind::Invalid,
                expected: None,
            });
            continue;
        }

        let system = match rng.gen_range(0..10) {
            0..=4 => CoordinateKind::Utm13,
            5..=6 => CoordinateKind::Utm14,
            _ => CoordinateKind::LatLng,
        };
        let clean = sample_point(&mut rng, &normal, system);

        let options = Damage::applicable(system);
        let damage = options[rng.gen_range(0..options.len())];
        let (x, y) = apply_damage(&mut rng, clean, system, damage);

        records.push(SampleRecord {
            id,
            x,
            y,
            damage,
            system,
            expected: Some(clean),
        });
    }

    Ok(records)
}

fn sample_point(rng: &mut StdRng, normal: &Normal<f64>, system: CoordinateKind) -> Xy {
    let bounds = bounds_for(system);
    let x = jitter(rng, normal, bounds, Axis::X);
    let y = jitter(rng, normal, bounds, Axis::Y);
    match system {
        // Decimetres for projected sources, micro-degrees for geographic ones.
        CoordinateKind::Utm13 | CoordinateKind::Utm14 => Xy::new(round_to(x, 1), round_to(y, 1)),
        _ => Xy::new(round_to(x, 6), round_to(y, 6)),
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn jitter(rng: &mut StdRng, normal: &Normal<f64>, bounds: BoundingBox, axis: Axis) -> f64 {
    let interval = match axis {
        Axis::X => bounds.x,
        Axis::Y => bounds.y,
    };
    let center = 0.5 * (interval.min + interval.max);
    let sigma = (interval.max - interval.min) * SIGMA_PER_WIDTH;
    (center + sigma * normal.sample(rng)).clamp(interval.min, interval.max)
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (v * f).round() / f
}

fn apply_damage(rng: &mut StdRng, clean: Xy, system: CoordinateKind, damage: Damage) -> (String, String) {
    let is_utm = matches!(system, CoordinateKind::Utm13 | CoordinateKind::Utm14);
    match damage {
        Damage::Clean => (clean.x.to_string(), clean.y.to_string()),
        Damage::Swapped => (clean.y.to_string(), clean.x.to_string()),
        Damage::ShiftedDecimal => {
            let shift: i32 = if is_utm {
                -rng.gen_range(1..=3)
            } else {
                *[-1, 1, 2].choose(rng).unwrap_or(&1)
            };
            let f = 10f64.powi(shift.abs());
            let (x, y) = if shift < 0 {
                (clean.x / f, clean.y / f)
            } else {
                (clean.x * f, clean.y * f)
            };
            (x.to_string(), y.to_string())
        }
        Damage::DroppedLeadingDigit => ((clean.x - 700_000.0).to_string(), clean.y.to_string()),
        Damage::SpuriousDigit => {
            let digit: u8 = rng.gen_range(0..=9);
            let y = insert_integer_digit(clean.y, 5, digit);
            // Half of these also lost the easting's decimal scale.
            let x = if rng.gen_bool(0.5) { clean.x / 1000.0 } else { clean.x };
            (x.to_string(), y)
        }
        Damage::FlippedSign => ((-clean.x).to_string(), clean.y.to_string()),
        Damage::NoisyText => {
            if is_utm {
                (format!("E {} m", with_thousands(clean.x)), format!("{} m N", with_thousands(clean.y)))
            } else {
                (format!("{:.6}°", clean.x), format!("Lat: {:.6}", clean.y))
            }
        }
        Damage::Placeholder | Damage::Garbage => (String::new(), String::new()),
    }
}

/// Insert `digit` into the integer part of `v` at `index`, keeping the fraction text.
fn insert_integer_digit(v: f64, index: usize, digit: u8) -> String {
    let text = format!("{v:.1}");
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let mut int = int.to_string();
    let at = index.min(int.len());
    int.insert(at, char::from(b'0' + digit));
    format!("{int}.{frac}")
}

fn with_thousands(v: f64) -> String {
    let text = format!("{v:.1}");
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let mut out = String::with_capacity(int.len() + int.len() / 3 + frac.len() + 1);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{out}.{frac}")
}
