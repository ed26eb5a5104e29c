//! Fresnel zones and earth curvature.

use terrain::math::MEAN_EARTH_RADIUS_KM;

/// Speed of light in m/s, rounded the way link planners round it.
const C: f64 = 3.0e8;

/// Effective earth radius multiplier for standard atmosphere.
pub const DEFAULT_K_FACTOR: f64 = 1.33;

/// Returns the wavelength (meters) of `freq_hz`, or 0 for non-positive
/// frequencies.
pub fn freq_to_wavelen(freq_hz: f64) -> f64 {
    if freq_hz > 0.0 {
        C / freq_hz
    } else {
        0.0
    }
}

/// Returns the radius (meters) of the nth fresnel zone at `d1_m`
/// along a path of `total_m`.
///
/// Zero at both ends of the path, and everywhere on a zero length
/// path.
pub fn fresnel(zone: u8, wavelen_m: f64, d1_m: f64, total_m: f64) -> f64 {
    if total_m <= 0.0 {
        return 0.0;
    }
    let d2_m = total_m - d1_m;
    (f64::from(zone) * wavelen_m * d1_m * d2_m / total_m)
        .max(0.0)
        .sqrt()
}

/// Returns how far (meters) the earth bulges above the chord between
/// the two ends of a `total_m` path, at `d_m` from the start.
///
/// Non-positive `k_factor` falls back to [`DEFAULT_K_FACTOR`].
pub fn earth_bulge(d_m: f64, total_m: f64, k_factor: f64) -> f64 {
    if total_m <= 0.0 {
        return 0.0;
    }
    let k_factor = if k_factor > 0.0 {
        k_factor
    } else {
        DEFAULT_K_FACTOR
    };
    let effective_radius_m = k_factor * MEAN_EARTH_RADIUS_KM * 1000.0;
    d_m * (total_m - d_m) / (2.0 * effective_radius_m)
}
