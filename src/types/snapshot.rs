//! The per-update output of the tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use super::route::ManeuverStep;
use crate::format::{format_distance, format_duration, format_speed_kmh};

/// Derived navigation signals for one update cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// The fix this snapshot was derived from.
    pub position: Coordinate,
    pub timestamp: DateTime<Utc>,

    /// Length of the not-yet-traversed geometry.
    pub remaining_distance_meters: f64,
    pub current_speed_meters_per_second: f64,

    /// [`None`] means "unknown": the traveler is (nearly) stationary or
    /// nothing remains.
    pub eta_seconds: Option<f64>,
    /// `timestamp + eta_seconds`, when the ETA is known.
    pub estimated_arrival: Option<DateTime<Utc>>,

    /// The next maneuver to perform, if any are left.
    pub current_instruction: Option<ManeuverStep>,
    pub current_step_index: usize,

    pub arrived: bool,
}

impl ProgressSnapshot {
    /// One-line rendering for a status bar, e.g.
    /// `"1.2 km • 15 min • 5.0 km/h • Turn left"`.
    pub fn summary(&self) -> String {
        if self.arrived {
            return "Arrived".to_string();
        }
        let eta = self
            .eta_seconds
            .map(format_duration)
            .unwrap_or_else(|| "--".to_string());
        let mut line = format!(
            "{} • {} • {}",
            format_distance(self.remaining_distance_meters),
            eta,
            format_speed_kmh(self.current_speed_meters_per_second)
        );
        if let Some(step) = &self.current_instruction {
            line.push_str(" • ");
            line.push_str(&step.instruction_text);
        }
        line
    }
}
