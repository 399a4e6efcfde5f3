//! The core of the navigation library.
//!
//! A [`ProgressTracker`] owns the mutable state of one trip: the
//! not-yet-traversed suffix of the route geometry, the instruction
//! cursor, and the last accepted fix with the speed derived from it.
//! Each call to [`ProgressTracker::update`] folds one fix into that
//! state and returns a [`ProgressSnapshot`].
//!
//! Waypoints are dropped only when a fix comes within a small radius
//! of them, rather than by projecting the fix onto the path. A brief
//! overshoot past a waypoint therefore never makes the remaining
//! geometry oscillate.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::config::NavigationConfig;
use crate::coordinate::{Coordinate, Fix};
use crate::cursor::InstructionCursor;
use crate::error::NavError;
use crate::haversine;
use crate::route::{ManeuverStep, Route};
use crate::snapshot::ProgressSnapshot;

/// Stateful progress tracker for a single route.
///
/// Calls must be serialized by the owner: the tracker assumes fixes
/// arrive one at a time.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    config: NavigationConfig,
    route: Option<Route>,

    /// Suffix of the route geometry. Points are only removed from the
    /// front.
    remaining: VecDeque<Coordinate>,
    cursor: InstructionCursor,

    last_fix: Option<Fix>,
    speed_meters_per_second: f64,
    arrived: bool,

    /// Length of the geometry already trimmed away.
    trimmed_meters: f64,
    skipped_samples: u64,
}

impl ProgressTracker {
    /// Creates a tracker with no route loaded.
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            route: None,
            remaining: VecDeque::new(),
            cursor: InstructionCursor::new(),
            last_fix: None,
            speed_meters_per_second: 0.0,
            arrived: false,
            trimmed_meters: 0.0,
            skipped_samples: 0,
        }
    }

    /// Creates a tracker and loads `route` into it.
    pub fn with_route(config: NavigationConfig, route: Route) -> Result<Self, NavError> {
        let mut tracker = Self::new(config);
        tracker.reset(route)?;
        Ok(tracker)
    }

    /// Discards all trip state and starts over on `route`.
    ///
    /// Callable at any time, e.g. when the route is rebuilt for another
    /// vehicle profile. An empty route leaves the tracker in the "no
    /// route" state and is reported as [`NavError::InvalidRoute`].
    pub fn reset(&mut self, route: Route) -> Result<(), NavError> {
        self.remaining.clear();
        self.cursor = InstructionCursor::new();
        self.last_fix = None;
        self.speed_meters_per_second = 0.0;
        self.arrived = false;
        self.trimmed_meters = 0.0;
        self.skipped_samples = 0;

        if route.is_empty() {
            warn!("reset with an empty route; tracker has no route");
            self.route = None;
            return Err(NavError::InvalidRoute("route geometry is empty".to_string()));
        }

        info!(
            "tracking route: {} points, {} steps, {:.0} m",
            route.geometry().len(),
            route.steps().len(),
            route.total_distance_meters()
        );
        self.remaining.extend(route.geometry().iter().copied());
        self.route = Some(route);
        Ok(())
    }

    /// Folds one fix into the trip state.
    ///
    /// An invalid coordinate is dropped without touching any state and
    /// reported as [`NavError::InvalidFix`]. Timestamps that do not move
    /// forward keep the previous speed estimate but are otherwise
    /// processed normally.
    pub fn update(&mut self, fix: Fix) -> Result<ProgressSnapshot, NavError> {
        if !fix.position.is_valid() {
            self.skipped_samples += 1;
            warn!(
                "skipping invalid fix {:?} ({} skipped so far)",
                fix.position, self.skipped_samples
            );
            return Err(NavError::InvalidFix(format!(
                "coordinate out of range: ({}, {})",
                fix.position.lat(),
                fix.position.lon()
            )));
        }
        if self.route.is_none() {
            return Err(NavError::InvalidRoute("no route loaded".to_string()));
        }

        // 1. speed
        self.update_speed(&fix);
        self.last_fix = Some(fix);

        if !self.arrived {
            // 2. trim passed waypoints
            self.trim_remaining(&fix.position);

            // 4. instruction cursor
            if let Some(route) = &self.route {
                self.cursor.advance(
                    &fix.position,
                    route.steps(),
                    self.config.instruction_proximity_meters,
                );
            }
        }

        // 3, 5 and 6 are derived from the state above
        let snapshot = self.snapshot_for(&fix);
        debug!(
            "remaining {:.1} m, speed {:.2} m/s, eta {:?}, step {}",
            snapshot.remaining_distance_meters,
            snapshot.current_speed_meters_per_second,
            snapshot.eta_seconds,
            snapshot.current_step_index
        );
        Ok(snapshot)
    }

    fn update_speed(&mut self, fix: &Fix) {
        let last = match &self.last_fix {
            Some(last) => last,
            None => return,
        };
        let elapsed = elapsed_seconds(last.timestamp, fix.timestamp);
        if elapsed <= 0.0 {
            debug!("non-increasing timestamp, keeping speed estimate");
            return;
        }
        self.speed_meters_per_second = haversine::distance(&last.position, &fix.position) / elapsed;
    }

    /// Drops front points within the arrival radius. The destination
    /// point itself is kept until arrival is confirmed.
    fn trim_remaining(&mut self, position: &Coordinate) {
        while self.remaining.len() > 1 {
            let front = self.remaining[0];
            if haversine::distance(position, &front) >= self.config.arrival_proximity_meters {
                break;
            }
            self.remaining.pop_front();
            if let Some(next) = self.remaining.front() {
                self.trimmed_meters += haversine::distance(&front, next);
            }
            debug!("passed waypoint {:?}", front);
        }
    }

    /// Marks the trip as finished. Returns `true` only the first time.
    ///
    /// The destination point is dropped and the geometry and cursor
    /// are frozen from here on.
    pub fn confirm_arrival(&mut self) -> bool {
        if self.arrived {
            return false;
        }
        while let Some(front) = self.remaining.pop_front() {
            if let Some(next) = self.remaining.front() {
                self.trimmed_meters += haversine::distance(&front, next);
            }
        }
        self.arrived = true;
        info!("arrival confirmed");
        true
    }

    /// Snapshot of the current state at the last accepted fix.
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        self.last_fix.as_ref().map(|fix| self.snapshot_for(fix))
    }

    fn snapshot_for(&self, fix: &Fix) -> ProgressSnapshot {
        let remaining_distance_meters = self.remaining_distance_meters();
        let speed = self.speed_meters_per_second;

        let eta_seconds = if !self.arrived
            && speed > self.config.eta_min_speed_meters_per_second
            && remaining_distance_meters > 0.0
        {
            Some(remaining_distance_meters / speed)
        } else {
            None
        };
        let estimated_arrival = eta_seconds.and_then(|eta| arrival_time(fix.timestamp, eta));

        ProgressSnapshot {
            position: fix.position,
            timestamp: fix.timestamp,
            remaining_distance_meters,
            current_speed_meters_per_second: speed,
            eta_seconds,
            estimated_arrival,
            current_instruction: self.current_instruction().cloned(),
            current_step_index: self.cursor.index(),
            arrived: self.arrived,
        }
    }

    /// True when more than `stale_after_seconds` have passed since the
    /// last accepted fix. A tracker that never saw a fix is not stale.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match &self.last_fix {
            Some(fix) => elapsed_seconds(fix.timestamp, now) > self.config.stale_after_seconds as f64,
            None => false,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn remaining_geometry(&self) -> &VecDeque<Coordinate> {
        &self.remaining
    }

    pub fn remaining_distance_meters(&self) -> f64 {
        haversine::path_length(&self.remaining)
    }

    /// Length of the geometry dropped so far. Together with
    /// [`Self::remaining_distance_meters`] it adds up to the length of
    /// the full route geometry.
    pub fn trimmed_distance_meters(&self) -> f64 {
        self.trimmed_meters
    }

    pub fn current_step_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn current_instruction(&self) -> Option<&ManeuverStep> {
        self.route
            .as_ref()
            .and_then(|route| self.cursor.current(route.steps()))
    }

    pub fn current_speed_meters_per_second(&self) -> f64 {
        self.speed_meters_per_second
    }

    pub fn last_fix(&self) -> Option<&Fix> {
        self.last_fix.as_ref()
    }

    pub fn is_arrived(&self) -> bool {
        self.arrived
    }

    /// Number of samples dropped as invalid since the last reset.
    pub fn skipped_samples(&self) -> u64 {
        self.skipped_samples
    }
}

/// `from + seconds`, or [`None`] when it falls outside chrono's range.
fn arrival_time(from: DateTime<Utc>, seconds: f64) -> Option<DateTime<Utc>> {
    let millis = (seconds * 1000.0).round();
    if !millis.is_finite() || millis >= i64::MAX as f64 {
        return None;
    }
    let offset = Duration::try_milliseconds(millis as i64)?;
    from.checked_add_signed(offset)
}

fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
