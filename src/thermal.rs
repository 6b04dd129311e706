//! Radiometric conversion: digital numbers to land-surface temperature.
//!
//! All functions are pure and operate cell-wise on `Array2<f64>` grids;
//! `f64::NAN` is the missing-value marker and propagates through every
//! step without panicking.

use ndarray::Array2;

use crate::config::DisplayRange;

/// Radiometric rescaling and thermal conversion constants for one band,
/// as published in the scene's MTL file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConstants {
    /// Multiplicative radiance rescaling factor (`RADIANCE_MULT_BAND_n`).
    pub radiance_mult: f64,
    /// Additive radiance rescaling offset (`RADIANCE_ADD_BAND_n`).
    pub radiance_add: f64,
    /// First thermal conversion constant (`K1_CONSTANT_BAND_n`).
    pub k1: f64,
    /// Second thermal conversion constant (`K2_CONSTANT_BAND_n`).
    pub k2: f64,
}

/// Top-of-atmosphere spectral radiance from raw digital numbers.
///
/// Non-positive radiance has no physical meaning and would blow up the
/// logarithm downstream, so those cells are replaced with NaN here.
pub fn dn_to_radiance(dn: &Array2<f64>, constants: &CalibrationConstants) -> Array2<f64> {
    dn.mapv(|v| {
        let radiance = constants.radiance_mult * v + constants.radiance_add;
        if radiance <= 0.0 {
            f64::NAN
        } else {
            radiance
        }
    })
}

/// Brightness temperature in Celsius from spectral radiance.
///
/// Inverse Planck relation: `K2 / ln(K1 / L + 1)`, then Kelvin to Celsius.
pub fn radiance_to_celsius(radiance: &Array2<f64>, constants: &CalibrationConstants) -> Array2<f64> {
    radiance.mapv(|l| constants.k2 / (constants.k1 / l + 1.0).ln() - 273.15)
}

/// Clamp finite temperatures to the closed display range.
///
/// Out-of-range values are pulled to the nearest bound; NaN cells stay
/// NaN rather than being clamped into a number.
pub fn clamp_display_range(celsius: &Array2<f64>, range: &DisplayRange) -> Array2<f64> {
    celsius.mapv(|t| {
        if t.is_nan() {
            f64::NAN
        } else {
            t.clamp(range.min, range.max)
        }
    })
}

/// Full digital-number to land-surface-temperature conversion.
///
/// The clamp is applied last, after missing-value substitution, so a
/// clamped value is never derived from masked radiance.
pub fn land_surface_temperature(
    dn: &Array2<f64>,
    constants: &CalibrationConstants,
    range: &DisplayRange,
) -> Array2<f64> {
    let radiance = dn_to_radiance(dn, constants);
    let celsius = radiance_to_celsius(&radiance, constants);
    clamp_display_range(&celsius, range)
}
