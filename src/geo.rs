//! Geographic primitives: great-circle distance and initial bearing.
//!
//! Coordinates are WGS-84 degrees (latitude north, longitude east). Distances
//! are meters, bearings are degrees true (0 = north, 90 = east). The sphere
//! approximation is accurate enough for the segment lengths a marker path is
//! made of.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another coordinate, in meters.
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        distance_m(*self, *other)
    }
}

impl From<[f64; 2]> for LatLng {
    /// Interprets a `[lat, lng]` pair, the order route files use.
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
pub fn distance_m(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Initial bearing (forward azimuth) from one coordinate to another.
///
/// Returns degrees in `[0, 360)`, 0 = north, 90 = east. Coincident points
/// yield 0.
pub fn bearing_deg(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let x = delta_lng.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    let mut bearing = x.atan2(y).to_degrees();
    if bearing < 0.0 {
        bearing += 360.0;
    }
    bearing
}
