//! Angle helpers shared by every module that consumes an ecliptic longitude.
//!
//! Every public function normalizes its inputs, so callers may pass raw
//! provider output or arithmetic results without pre-wrapping them.

/// Wrap any finite angle into `[0, 360)`.
///
/// Non-finite input maps to `0.0` so a NaN can never leak into a sign or
/// house lookup as a silently wrong index.
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest angular distance between two longitudes, in `[0, 180]`.
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Arc travelled going forward (increasing longitude) from `from` to `to`, in `[0, 360)`.
pub fn forward_arc(from: f64, to: f64) -> f64 {
    normalize_degrees(to - from)
}

/// Signed shortest motion from `from` to `to`, in `(-180, 180]`.
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let arc = forward_arc(from, to);
    if arc > 180.0 {
        arc - 360.0
    } else {
        arc
    }
}

/// Half-open, wrap-aware membership test for `[start, end)`.
///
/// When `start > end` the interval crosses 0°, so membership is
/// `lon >= start || lon < end`.
pub fn in_arc(lon: f64, start: f64, end: f64) -> bool {
    let lon = normalize_degrees(lon);
    let start = normalize_degrees(start);
    let end = normalize_degrees(end);
    if start <= end {
        lon >= start && lon < end
    } else {
        lon >= start || lon < end
    }
}
