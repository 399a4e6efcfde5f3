//! Tunable thresholds for the tracker.

use serde::{Deserialize, Serialize};

use super::error::NavError;

/// A waypoint closer than this is considered passed. Also the radius
/// used to confirm arrival at the destination.
pub const ARRIVAL_PROXIMITY_METERS: f64 = 20.0;
/// A fix closer than this to a step's trigger point completes the step.
pub const INSTRUCTION_PROXIMITY_METERS: f64 = 30.0;
/// Below this speed (about 1 km/h) the ETA is reported as unknown.
pub const ETA_MIN_SPEED_METERS_PER_SECOND: f64 = 0.28;
/// A tracker without a fix for this long is reported as stale.
pub const STALE_AFTER_SECONDS: i64 = 30;

/// Thresholds used by [`crate::tracker::ProgressTracker`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub arrival_proximity_meters: f64,
    pub instruction_proximity_meters: f64,
    pub eta_min_speed_meters_per_second: f64,
    pub stale_after_seconds: i64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            arrival_proximity_meters: ARRIVAL_PROXIMITY_METERS,
            instruction_proximity_meters: INSTRUCTION_PROXIMITY_METERS,
            eta_min_speed_meters_per_second: ETA_MIN_SPEED_METERS_PER_SECOND,
            stale_after_seconds: STALE_AFTER_SECONDS,
        }
    }
}

impl NavigationConfig {
    /// Parses a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let config: NavigationConfig =
            serde_json::from_str(json).map_err(|e| NavError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Every threshold must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), NavError> {
        let distances = [
            ("arrival_proximity_meters", self.arrival_proximity_meters),
            (
                "instruction_proximity_meters",
                self.instruction_proximity_meters,
            ),
            (
                "eta_min_speed_meters_per_second",
                self.eta_min_speed_meters_per_second,
            ),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(NavError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.stale_after_seconds <= 0 {
            return Err(NavError::InvalidConfig(format!(
                "stale_after_seconds must be positive, got {}",
                self.stale_after_seconds
            )));
        }
        Ok(())
    }
}
