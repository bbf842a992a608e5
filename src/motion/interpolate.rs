//! Shared interpolation and validation helpers for the motion core.

use crate::error::MotionError;
use crate::geo::LatLng;

/// Meters-per-second from a km/h input. Fails on zero, negative, or
/// non-finite values.
pub fn speed_mps(speed_kmh: f64) -> Result<f64, MotionError> {
    if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
        return Err(MotionError::InvalidSpeed(speed_kmh));
    }
    Ok(speed_kmh * 1000.0 / 3600.0)
}

/// A path needs at least two waypoints to define a segment.
pub fn validate_path(path: &[LatLng]) -> Result<(), MotionError> {
    if path.len() < 2 {
        return Err(MotionError::PathTooShort(path.len()));
    }
    Ok(())
}

/// Linear interpolation in coordinate space at fraction `factor` along the
/// segment. `factor` 0 is `start`, 1 is `end`.
pub fn lerp(start: LatLng, end: LatLng, factor: f64) -> LatLng {
    LatLng::new(
        start.lat + (end.lat - start.lat) * factor,
        start.lng + (end.lng - start.lng) * factor,
    )
}
