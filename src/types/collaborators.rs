//! Contracts for the external services a navigation session talks to.
//!
//! The tracker itself stays synchronous and callback-free. These traits
//! only describe what a session needs from its surroundings, so tests
//! can stand in plain structs for a routing API, a GPS receiver or a UI.

use uuid::Uuid;

use super::coordinate::{Coordinate, Fix};
use super::error::NavError;
use super::profile::VehicleProfile;
use super::route::Route;
use super::snapshot::ProgressSnapshot;
use super::status::SessionStatus;

/// Supplies a [`Route`] between two points for a vehicle profile.
pub trait RouteSource {
    /// Failures are reported as [`NavError::RouteSourceUnavailable`].
    fn build_route(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        profile: VehicleProfile,
    ) -> Result<Route, NavError>;
}

/// Something that delivers position events once subscribed.
///
/// Fixes are not pushed through the trait: the owner of the event
/// loop hands them to [`crate::session::NavigationSession::handle_event`].
/// `subscribe` only starts observation and returns the handle that ends
/// it.
pub trait PositionSource {
    /// Fails with [`NavError::PositionSourceUnavailable`] when
    /// observation cannot start at all (e.g. permission denied).
    fn subscribe(&mut self) -> Result<Box<dyn Subscription>, NavError>;
}

/// A cancellable, long-lived observation of a position source.
pub trait Subscription {
    /// Stops delivery. Calling it more than once is harmless.
    fn cancel(&mut self);
}

/// One item from a position source.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Fix(Fix),
    /// Permanent loss of the source. Signal loss is not an error and
    /// simply produces no events.
    Lost(String),
}

/// Receives the derived signals. Purely informational.
pub trait PresentationSink {
    fn on_snapshot(&mut self, snapshot: &ProgressSnapshot);

    /// A sample was dropped. Defaults to doing nothing.
    fn on_skipped_sample(&mut self, _error: &NavError) {}

    /// The session ended without arriving, e.g. the position source
    /// went away.
    fn on_session_stopped(&mut self, status: SessionStatus, reason: &NavError);
}

/// Receives exactly one arrival notification per trip.
pub trait ArrivalSink {
    fn on_arrival(&mut self, trip_id: Uuid, snapshot: &ProgressSnapshot);
}
