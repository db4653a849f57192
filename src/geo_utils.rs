//! Geographic utilities: distance, path length and longitude arithmetic.
//!
//! - Haversine great-circle distance (metres) between two locations
//! - Polyline length along a sequence of locations
//! - Longitude normalization and eastward angular distance on the
//!   360°-periodic circle

use geo::{Distance, Haversine, Point};

use crate::GpsPoint;

/// Calculate haversine distance between two GPS points in meters.
///
/// # Example
/// ```
/// use track_heatmap::GpsPoint;
/// use track_heatmap::geo_utils::haversine_distance;
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
/// let d = haversine_distance(&london, &paris);
/// assert!((d - 343_500.0).abs() < 2_000.0);
/// ```
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Total distance along a path of points, in meters.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Normalize a longitude into [-180, 180). Values already in range are
/// returned unchanged.
pub fn normalize_longitude(longitude: f64) -> f64 {
    if (-180.0..180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Degrees travelled going east from `from` to `to`, in [0, 360).
///
/// Inputs are expected to be normalized; `normalize_longitude` first if
/// they may lie outside [-180, 180).
pub fn eastward_distance(from: f64, to: f64) -> f64 {
    let delta = to - from;
    if delta >= 0.0 {
        delta
    } else {
        delta + 360.0
    }
}
