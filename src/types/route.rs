//! Struct definitions and implementations for a planned [`Route`].
//!
//! A route is built once per route request and replaced wholesale when
//! rebuilt (for example on a vehicle-profile change). It is never
//! mutated in place; the tracker keeps its own shrinking copy of the
//! geometry.

use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use super::error::NavError;
use crate::haversine;

/// An instruction tied to a trigger point along the route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManeuverStep {
    /// Passing within the instruction radius of this point completes
    /// the step.
    pub trigger_point: Coordinate,

    /// Human-readable text, e.g. "Turn left onto Anna Salai".
    pub instruction_text: String,
}

impl ManeuverStep {
    pub fn new(trigger_point: Coordinate, instruction_text: impl Into<String>) -> Self {
        Self {
            trigger_point,
            instruction_text: instruction_text.into(),
        }
    }
}

/// A planned path plus its turn-by-turn steps and upstream totals.
///
/// Deserialization is checked by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRoute")]
pub struct Route {
    geometry: Vec<Coordinate>,
    steps: Vec<ManeuverStep>,
    total_distance_meters: f64,
    base_duration_seconds: f64,
}

#[derive(Deserialize)]
struct RawRoute {
    geometry: Vec<Coordinate>,
    steps: Vec<ManeuverStep>,
    total_distance_meters: f64,
    base_duration_seconds: f64,
}

impl TryFrom<RawRoute> for Route {
    type Error = NavError;

    fn try_from(raw: RawRoute) -> Result<Self, Self::Error> {
        Route::new(
            raw.geometry,
            raw.steps,
            raw.total_distance_meters,
            raw.base_duration_seconds,
        )
    }
}

impl Route {
    /// Creates a route after checking the geometry.
    ///
    /// An empty geometry is accepted (the tracker reports it as "no
    /// route"), but a single point or any invalid coordinate is not.
    pub fn new(
        geometry: Vec<Coordinate>,
        steps: Vec<ManeuverStep>,
        total_distance_meters: f64,
        base_duration_seconds: f64,
    ) -> Result<Self, NavError> {
        if geometry.len() == 1 {
            return Err(NavError::InvalidRoute(
                "geometry must have at least 2 points".to_string(),
            ));
        }
        if let Some(bad) = geometry.iter().find(|c| !c.is_valid()) {
            return Err(NavError::InvalidRoute(format!(
                "geometry contains invalid coordinate {:?}",
                bad
            )));
        }
        if let Some(bad) = steps.iter().find(|s| !s.trigger_point.is_valid()) {
            return Err(NavError::InvalidRoute(format!(
                "step '{}' has invalid trigger point",
                bad.instruction_text
            )));
        }
        if !total_distance_meters.is_finite()
            || total_distance_meters < 0.0
            || !base_duration_seconds.is_finite()
            || base_duration_seconds < 0.0
        {
            return Err(NavError::InvalidRoute(format!(
                "invalid totals: distance {} m, duration {} s",
                total_distance_meters, base_duration_seconds
            )));
        }

        Ok(Self {
            geometry,
            steps,
            total_distance_meters,
            base_duration_seconds,
        })
    }

    /// Creates a route whose totals are derived from the geometry
    /// itself, with the duration left at zero.
    pub fn from_geometry(
        geometry: Vec<Coordinate>,
        steps: Vec<ManeuverStep>,
    ) -> Result<Self, NavError> {
        let total = haversine::path_length(&geometry);
        Self::new(geometry, steps, total, 0.0)
    }

    pub fn geometry(&self) -> &[Coordinate] {
        &self.geometry
    }

    pub fn steps(&self) -> &[ManeuverStep] {
        &self.steps
    }

    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_meters
    }

    pub fn base_duration_seconds(&self) -> f64 {
        self.base_duration_seconds
    }

    /// The last point of the geometry, if any.
    pub fn destination(&self) -> Option<&Coordinate> {
        self.geometry.last()
    }

    /// True for an empty geometry.
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}
