//! Angle utilities used across the orientation pipeline.

/// Wraps an azimuth in degrees into the range [0, 360).
#[inline]
pub fn wrap_azimuth(deg: f64) -> f64 {
    let mut norm = deg.rem_euclid(360.0);
    if norm >= 360.0 {
        norm -= 360.0;
    }
    norm
}

/// Computes the smallest unsigned difference between two azimuths in degrees,
/// accounting for wraparound (e.g. 359° vs 1° → 2°).
#[inline]
pub fn azimuth_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs().rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// `acos` with the argument clamped to [-1, 1] to tolerate floating round-off
/// that would otherwise produce a domain error (NaN).
#[inline]
pub fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// `asin` with the argument clamped to [-1, 1].
#[inline]
pub fn clamped_asin(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}
