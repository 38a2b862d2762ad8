//! Great-circle distance between positions.
//!
//! Distances use the haversine formula on a spherical Earth with the mean
//! radius below. Error against the WGS-84 ellipsoid stays under ~0.5%,
//! which is plenty for "how far away is that" questions.

use super::types::Position;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Returns the great-circle distance between two positions in kilometers.
///
/// The result is symmetric, zero for identical coordinates, and never
/// larger than half the Earth's circumference. Altitude is ignored.
///
/// # Examples
///
/// ```
/// use location_facade::location::{distance_kilometers, Position};
///
/// let paris = Position::new(48.8566, 2.3522).unwrap();
/// let london = Position::new(51.5074, -0.1278).unwrap();
///
/// let km = distance_kilometers(&paris, &london);
/// assert!((343.0..=344.0).contains(&km));
/// ```
#[must_use]
pub fn distance_kilometers(a: &Position, b: &Position) -> f64 {
    haversine_kilometers(
        (a.latitude(), a.longitude()),
        (b.latitude(), b.longitude()),
    )
}

/// Same as [`distance_kilometers`], in meters.
#[must_use]
pub fn distance_meters(a: &Position, b: &Position) -> f64 {
    distance_kilometers(a, b) * 1000.0
}

/// Haversine distance between two `(latitude, longitude)` pairs in degrees.
#[must_use]
pub fn haversine_kilometers(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1.0 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}
