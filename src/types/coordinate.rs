//! Struct definitions and implementations for [`Coordinate`] and
//! [`Fix`].

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::error::NavError;

/// A [`Coordinate`] is an immutable value type that represents a point
/// on the earth's surface in decimal degrees.
///
/// `OrderedFloat` is used so coordinates can be compared and hashed,
/// which lets a route's geometry be checked for exact equality.
///
/// Deserialization goes through [`Coordinate::new`], so out-of-range
/// input is rejected there too.
///
/// Fields are read through [`Coordinate::lat`] and [`Coordinate::lon`]
/// and cannot be reassigned from outside the crate:
///
/// ```compile_fail
/// let mut c = navtrack::coordinate::Coordinate::new(0.0, 0.0).unwrap();
/// c.latitude = ordered_float::OrderedFloat(200.0);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub(crate) latitude: OrderedFloat<f64>,
    pub(crate) longitude: OrderedFloat<f64>,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = NavError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Builds a coordinate, rejecting NaN, infinite or out-of-range
    /// values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, NavError> {
        let coordinate = Self::unchecked(latitude, longitude);
        if !coordinate.is_valid() {
            return Err(NavError::InvalidFix(format!(
                "coordinate out of range: ({}, {})",
                latitude, longitude
            )));
        }
        Ok(coordinate)
    }

    /// Builds a coordinate without validation. Raw samples from a
    /// position source arrive this way and are checked by the tracker.
    pub const fn unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: OrderedFloat(latitude),
            longitude: OrderedFloat(longitude),
        }
    }

    /// Latitude in [-90, 90], longitude in [-180, 180], both finite.
    pub fn is_valid(&self) -> bool {
        let lat = self.latitude.into_inner();
        let lon = self.longitude.into_inner();
        lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon)
    }

    pub fn lat(&self) -> f64 {
        self.latitude.into_inner()
    }

    pub fn lon(&self) -> f64 {
        self.longitude.into_inner()
    }
}

/// A single timestamped position sample.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub position: Coordinate,
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    pub fn new(position: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            position,
            timestamp,
        }
    }
}
