//! Inverse Transverse Mercator projection (UTM -> WGS84 geographic).
//!
//! This is the closed-form Snyder/USGS series:
//!
//! ```text
//! x' = (E - 500000) / k0        y' = N / k0
//! φf = footpoint latitude of y'
//! φ  = φf + Σ_{k=1..4} x_{2k}frac · x_{2k}poly · x'^{2k}
//! λ  = λ0 + x1frac · x' + Σ_{k=1..3} x_{2k+1}frac · x_{2k+1}poly · x'^{2k+1}
//! ```
//!
//! Numerical notes:
//! - The coefficients are kept term-for-term so results agree with other
//!   implementations of the same series to well below 1e-6 degrees.
//! - Only the northern hemisphere is handled; the serviced zones are 13N/14N.

use std::f64::consts::PI;

use crate::domain::{GeoPoint, UtmZone, Xy};

/// WGS84 semi-major axis (m).
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 semi-minor axis (m).
pub const WGS84_B: f64 = 6_356_752.314;

/// UTM central-meridian scale factor.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;

/// Added to every easting so values within a zone stay positive.
pub const FALSE_EASTING: f64 = 500_000.0;

/// Central meridian of a UTM zone, in radians.
pub fn central_meridian(zone: u8) -> f64 {
    (-183.0 + 6.0 * f64::from(zone)) * PI / 180.0
}

/// Footpoint latitude (radians) for an unscaled northing `y` (metres).
///
/// Inverts the meridian arc via the rectifying sphere of radius `α`.
pub fn footpoint_latitude(y: f64) -> f64 {
    let n = (WGS84_A - WGS84_B) / (WGS84_A + WGS84_B);
    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n3 * n;
    let n5 = n4 * n;

    let alpha = ((WGS84_A + WGS84_B) / 2.0) * (1.0 + n2 / 4.0 + n4 / 64.0);
    let y_bar = y / alpha;

    let beta = (3.0 * n / 2.0) + (-27.0 * n3 / 32.0) + (269.0 * n5 / 512.0);
    let gamma = (21.0 * n2 / 16.0) + (-55.0 * n4 / 32.0);
    let delta = (151.0 * n3 / 96.0) + (-417.0 * n5 / 128.0);
    let epsilon = 1097.0 * n4 / 512.0;

    y_bar
        + beta * (2.0 * y_bar).sin()
        + gamma * (4.0 * y_bar).sin()
        + delta * (6.0 * y_bar).sin()
        + epsilon * (8.0 * y_bar).sin()
}

/// Project unscaled Transverse Mercator `(x, y)` back to `(φ, λ)` in radians.
///
/// `x` must already have the false easting removed; `lambda0` is the central meridian.
pub fn map_xy_to_lat_lon(x: f64, y: f64, lambda0: f64) -> (f64, f64) {
    let phif = footpoint_latitude(y);

    let ep2 = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let cf = phif.cos();
    let nuf2 = ep2 * cf * cf;
    let nf = WGS84_A * WGS84_A / (WGS84_B * (1.0 + nuf2).sqrt());

    let tf = phif.tan();
    let tf2 = tf * tf;
    let tf4 = tf2 * tf2;

    // Successive powers of Nf.
    let mut nf_pow = nf;
    let x1frac = 1.0 / (nf_pow * cf);
    nf_pow *= nf;
    let x2frac = tf / (2.0 * nf_pow);
    nf_pow *= nf;
    let x3frac = 1.0 / (6.0 * nf_pow * cf);
    nf_pow *= nf;
    let x4frac = tf / (24.0 * nf_pow);
    nf_pow *= nf;
    let x5frac = 1.0 / (120.0 * nf_pow * cf);
    nf_pow *= nf;
    let x6frac = tf / (720.0 * nf_pow);
    nf_pow *= nf;
    let x7frac = 1.0 / (5040.0 * nf_pow * cf);
    nf_pow *= nf;
    let x8frac = tf / (40320.0 * nf_pow);

    let x2poly = -1.0 - nuf2;
    let x3poly = -1.0 - 2.0 * tf2 - nuf2;
    let x4poly = 5.0 + 3.0 * tf2 + 6.0 * nuf2
        - 6.0 * tf2 * nuf2
        - 3.0 * (nuf2 * nuf2)
        - 9.0 * tf2 * (nuf2 * nuf2);
    let x5poly = 5.0 + 28.0 * tf2 + 24.0 * tf4 + 6.0 * nuf2 + 8.0 * tf2 * nuf2;
    let x6poly = -61.0 - 90.0 * tf2 - 45.0 * tf4 - 107.0 * nuf2 + 162.0 * tf2 * nuf2;
    let x7poly = -61.0 - 662.0 * tf2 - 1320.0 * tf4 - 720.0 * (tf4 * tf2);
    let x8poly = 1385.0 + 3633.0 * tf2 + 4095.0 * tf4 + 1575.0 * (tf4 * tf2);

    let xp2 = x * x;
    let xp3 = xp2 * x;
    let xp4 = xp3 * x;
    let xp5 = xp4 * x;
    let xp6 = xp5 * x;
    let xp7 = xp6 * x;
    let xp8 = xp7 * x;

    let phi = phif
        + x2frac * x2poly * xp2
        + x4frac * x4poly * xp4
        + x6frac * x6poly * xp6
        + x8frac * x8poly * xp8;

    let lambda = lambda0
        + x1frac * x
        + x3frac * x3poly * xp3
        + x5frac * x5poly * xp5
        + x7frac * x7poly * xp7;

    (phi, lambda)
}

/// Convert a northern-hemisphere UTM `(easting, northing)` to WGS84 degrees.
///
/// Callers are expected to pass a pair that already validated for `zone`.
pub fn utm_to_geographic(utm: Xy, zone: UtmZone) -> GeoPoint {
    let x = (utm.x - FALSE_EASTING) / UTM_SCALE_FACTOR;
    let y = utm.y / UTM_SCALE_FACTOR;

    let (phi, lambda) = map_xy_to_lat_lon(x, y, central_meridian(zone.number()));

    GeoPoint {
        lat: phi.to_degrees(),
        lng: lambda.to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_meridians_of_serviced_zones() {
        assert!((central_meridian(13).to_degrees() - -105.0).abs() < 1e-12);
        assert!((central_meridian(14).to_degrees() - -99.0).abs() < 1e-12);
    }

    #[test]
    fn footpoint_of_equator_is_zero() {
        assert!(footpoint_latitude(0.0).abs() < 1e-15);
    }

    #[test]
    fn central_meridian_point_projects_onto_meridian() {
        let p = utm_to_geographic(Xy::new(500_000.0, 2_400_000.0), UtmZone::Z13);
        assert!((p.lng - -105.0).abs() < 1e-12, "lng {}", p.lng);
        assert!((p.lat - 21.703417).abs() < 1e-4, "lat {}", p.lat);
    }

    #[test]
    fn aguascalientes_reference_point_zone_13() {
        let p = utm_to_geographic(Xy::new(781_265.0, 2_414_688.0), UtmZone::Z13);
        assert!((p.lat - 21.813691).abs() < 1e-4, "lat {}", p.lat);
        assert!((p.lng - -102.279400).abs() < 1e-4, "lng {}", p.lng);
    }

    #[test]
    fn zone_14_point_lands_east_of_zone_13() {
        let p = utm_to_geographic(Xy::new(250_000.0, 2_400_000.0), UtmZone::Z14);
        assert!((p.lat - 21.685812).abs() < 1e-4, "lat {}", p.lat);
        assert!((p.lng - -101.416180).abs() < 1e-4, "lng {}", p.lng);
    }
}
