//! Great-circle distance and bearing helpers.
//!
//! All functions are pure and never fail for well-formed coordinates.

use crate::coordinate::Coordinate;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters, using the
/// haversine formula.
///
/// The result is non-negative and symmetric in its arguments.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // clamp guards asin against rounding just above 1.0
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_METERS * c
}

/// Sum of consecutive pairwise distances. Zero for fewer than two
/// points.
pub fn path_length<'a, I>(points: I) -> f64
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut iter = points.into_iter();
    let mut prev = match iter.next() {
        Some(p) => p,
        None => return 0.0,
    };
    let mut total = 0.0;
    for p in iter {
        total += distance(prev, p);
        prev = p;
    }
    total
}

/// Initial bearing from `a` to `b` in degrees, normalized to [0, 360).
pub fn bearing_degrees(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}
