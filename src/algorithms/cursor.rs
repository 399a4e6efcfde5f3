//! Walks an ordered list of maneuver steps as the traveler passes each
//! step's trigger point.

use crate::haversine;
use crate::coordinate::Coordinate;
use crate::route::ManeuverStep;

/// Cursor into a route's steps.
///
/// The index only ever moves forward, and by at most one step per
/// call to [`InstructionCursor::advance`]. A dense fix stream is
/// assumed, so a fix near several future triggers still completes only
/// the current one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstructionCursor {
    index: usize,
}

impl InstructionCursor {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Index of the step the traveler is heading for.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Advances past the current step if `fix` is within
    /// `proximity_meters` of its trigger point, then returns the step
    /// now current, or [`None`] once every step is done.
    pub fn advance<'a>(
        &mut self,
        fix: &Coordinate,
        steps: &'a [ManeuverStep],
        proximity_meters: f64,
    ) -> Option<&'a ManeuverStep> {
        let step = steps.get(self.index)?;

        let distance = haversine::distance(fix, &step.trigger_point);
        if distance < proximity_meters {
            debug!(
                "step {} '{}' reached ({:.1} m)",
                self.index, step.instruction_text, distance
            );
            self.index += 1;
        }

        steps.get(self.index)
    }

    /// The current step without moving the cursor.
    pub fn current<'a>(&self, steps: &'a [ManeuverStep]) -> Option<&'a ManeuverStep> {
        steps.get(self.index)
    }
}
