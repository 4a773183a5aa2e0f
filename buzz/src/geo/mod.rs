//! Great-circle distance between geographic positions.
//!
//! Positions are `(latitude, longitude)` pairs in decimal degrees. Distances
//! are returned in meters using a spherical Earth model.

use std::f64::consts::PI;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Calculate the distance between two positions using the haversine formula.
///
/// # Arguments
///
/// * `from` - First position as (latitude, longitude) in degrees
/// * `to` - Second position as (latitude, longitude) in degrees
///
/// # Returns
///
/// Distance in meters.
///
/// # Example
///
/// ```
/// use buzz::geo::haversine_distance_m;
///
/// // 0.0003 degrees of latitude is roughly 33 meters
/// let dist = haversine_distance_m((13.0, 80.0), (13.0003, 80.0));
/// assert!((dist - 33.4).abs() < 0.5);
/// ```
pub fn haversine_distance_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    let sin_dlat = (delta_lat / 2.0).sin();
    let sin_dlon = (delta_lon / 2.0).sin();

    let a = sin_dlat * sin_dlat + sin_dlon * sin_dlon * lat1_rad.cos() * lat2_rad.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}
