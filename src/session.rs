//! Orchestrates one active trip.
//!
//! A [`NavigationSession`] owns the [`ProgressTracker`] for the trip,
//! the subscription to the position source, and the sinks that receive
//! its output. Fixes reach it through plain calls to
//! [`NavigationSession::handle_event`], so whatever event loop the
//! platform uses stays outside this crate.

use uuid::Uuid;

use crate::collaborators::{
    ArrivalSink, PositionEvent, PositionSource, PresentationSink, RouteSource, Subscription,
};
use crate::config::NavigationConfig;
use crate::coordinate::{Coordinate, Fix};
use crate::error::NavError;
use crate::haversine;
use crate::profile::VehicleProfile;
use crate::route::Route;
use crate::snapshot::ProgressSnapshot;
use crate::status::SessionStatus;
use crate::tracker::ProgressTracker;

/// Asks `source` for a route. Nothing is started here; a failure is
/// handed back as [`NavError::RouteSourceUnavailable`] and never retried.
pub fn plan_route(
    source: &dyn RouteSource,
    from: &Coordinate,
    to: &Coordinate,
    profile: VehicleProfile,
) -> Result<Route, NavError> {
    info!("requesting {} route from {:?} to {:?}", profile, from, to);
    source.build_route(from, to, profile).map_err(|e| {
        error!("route request failed: {}", e);
        match e {
            NavError::RouteSourceUnavailable(_) => e,
            other => NavError::RouteSourceUnavailable(other.to_string()),
        }
    })
}

/// Controller for a single trip.
pub struct NavigationSession<P, A>
where
    P: PresentationSink,
    A: ArrivalSink,
{
    trip_id: Uuid,
    tracker: ProgressTracker,
    subscription: Option<Box<dyn Subscription>>,
    status: SessionStatus,
    presentation: P,
    arrival: A,
}

impl<P, A> NavigationSession<P, A>
where
    P: PresentationSink,
    A: ArrivalSink,
{
    pub fn new(config: NavigationConfig, presentation: P, arrival: A) -> Self {
        Self {
            trip_id: Uuid::new_v4(),
            tracker: ProgressTracker::new(config),
            subscription: None,
            status: SessionStatus::Idle,
            presentation,
            arrival,
        }
    }

    /// Loads `route` into a fresh tracker and subscribes to `source`.
    ///
    /// A trip already in progress is stopped first, so this doubles as
    /// the rebuild path when the route changes mid-trip.
    pub fn start(
        &mut self,
        route: Route,
        source: &mut dyn PositionSource,
    ) -> Result<(), NavError> {
        self.cancel_subscription();
        self.trip_id = Uuid::new_v4();
        self.status = SessionStatus::Idle;
        self.tracker.reset(route)?;

        let subscription = source.subscribe().map_err(|e| {
            warn!("position source unavailable: {}", e);
            e
        })?;
        self.subscription = Some(subscription);
        self.status = SessionStatus::Navigating;
        info!("trip {} started", self.trip_id);
        Ok(())
    }

    /// Dispatches one item from the position source.
    ///
    /// Events that arrive after the session has left
    /// [`SessionStatus::Navigating`] are dropped.
    pub fn handle_event(&mut self, event: PositionEvent) {
        if !self.status.is_active() {
            debug!("session not navigating, dropping {:?}", event);
            return;
        }
        match event {
            PositionEvent::Fix(fix) => self.on_fix(fix),
            PositionEvent::Lost(reason) => self.on_source_lost(reason),
        }
    }

    /// Feeds events until the iterator ends or the session stops.
    pub fn drive<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = PositionEvent>,
    {
        for event in events {
            if !self.status.is_active() {
                break;
            }
            self.handle_event(event);
        }
    }

    fn on_fix(&mut self, fix: Fix) {
        match self.tracker.update(fix) {
            Ok(snapshot) => {
                self.presentation.on_snapshot(&snapshot);
                self.on_snapshot(snapshot);
            }
            Err(e @ NavError::InvalidFix(_)) => self.presentation.on_skipped_sample(&e),
            Err(e) => error!("update failed: {}", e),
        }
    }

    /// Confirms arrival once the fix itself is within the arrival
    /// radius of the route's final point. This is separate from
    /// waypoint trimming, which only looks at the front of the
    /// remaining geometry.
    fn on_snapshot(&mut self, snapshot: ProgressSnapshot) {
        let destination = match self.tracker.route().and_then(|r| r.destination()) {
            Some(destination) => *destination,
            None => return,
        };
        let distance = haversine::distance(&snapshot.position, &destination);
        if distance >= self.tracker.config().arrival_proximity_meters {
            return;
        }
        if !self.tracker.confirm_arrival() {
            return;
        }

        self.cancel_subscription();
        self.status = SessionStatus::Arrived;
        info!("trip {} arrived ({:.1} m from destination)", self.trip_id, distance);

        let final_snapshot = self.tracker.snapshot().unwrap_or(snapshot);
        self.presentation.on_snapshot(&final_snapshot);
        self.arrival.on_arrival(self.trip_id, &final_snapshot);
    }

    fn on_source_lost(&mut self, reason: String) {
        warn!("trip {} lost its position source: {}", self.trip_id, reason);
        self.cancel_subscription();
        self.status = SessionStatus::Stopped;
        let error = NavError::PositionSourceUnavailable(reason);
        self.presentation.on_session_stopped(self.status, &error);
    }

    /// Cancels position observation. Safe to call repeatedly; once it
    /// returns no further fix reaches the tracker.
    pub fn stop(&mut self) {
        if self.status.is_active() {
            info!("trip {} stopped", self.trip_id);
            self.status = SessionStatus::Idle;
        }
        self.cancel_subscription();
    }

    fn cancel_subscription(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }

    pub fn trip_id(&self) -> Uuid {
        self.trip_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn arrival(&self) -> &A {
        &self.arrival
    }
}
