use chrono::{DateTime, Duration, Utc};
use navtrack::collaborators::{
    ArrivalSink, PositionEvent, PositionSource, PresentationSink, Subscription,
};
use navtrack::config::NavigationConfig;
use navtrack::coordinate::{Coordinate, Fix};
use navtrack::error::NavError;
use navtrack::haversine;
use navtrack::route::{ManeuverStep, Route};
use navtrack::session::NavigationSession;
use navtrack::snapshot::ProgressSnapshot;
use navtrack::status::SessionStatus;
use navtrack::tracker::ProgressTracker;
use rand::{rngs::StdRng, Rng, SeedableRng};
use uuid::Uuid;

/// Degrees of latitude per meter on a 6371 km sphere.
const DEG_PER_METER: f64 = 1.0 / 111_194.93;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn start_time() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
}

fn point(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

/// Three points forming an L: 1000 m north, then 1000 m east.
fn l_shape() -> Vec<Coordinate> {
    let leg = 1000.0 * DEG_PER_METER;
    vec![point(0.0, 0.0), point(leg, 0.0), point(leg, leg)]
}

/// Positions every `spacing` meters along `geometry`, ending exactly on
/// its last point.
fn walk(geometry: &[Coordinate], spacing: f64) -> Vec<Coordinate> {
    let mut positions = Vec::new();
    for pair in geometry.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = haversine::distance(&a, &b);
        let steps = (length / spacing).ceil() as usize;
        for i in 0..steps {
            let t = i as f64 * spacing / length;
            positions.push(point(
                a.lat() + (b.lat() - a.lat()) * t,
                a.lon() + (b.lon() - a.lon()) * t,
            ));
        }
    }
    if let Some(last) = geometry.last() {
        positions.push(*last);
    }
    positions
}

fn fixes(positions: &[Coordinate], interval_seconds: i64) -> Vec<Fix> {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| Fix::new(*p, start_time() + Duration::seconds(i as i64 * interval_seconds)))
        .collect()
}

#[derive(Default)]
struct Screen {
    snapshots: Vec<ProgressSnapshot>,
    stopped: Vec<(SessionStatus, NavError)>,
}

impl PresentationSink for Screen {
    fn on_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn on_session_stopped(&mut self, status: SessionStatus, reason: &NavError) {
        self.stopped.push((status, reason.clone()));
    }
}

#[derive(Default)]
struct Alerts(Vec<(Uuid, ProgressSnapshot)>);

impl ArrivalSink for Alerts {
    fn on_arrival(&mut self, trip_id: Uuid, snapshot: &ProgressSnapshot) {
        self.0.push((trip_id, snapshot.clone()));
    }
}

struct Watch;

impl Subscription for Watch {
    fn cancel(&mut self) {}
}

struct Gps;

impl PositionSource for Gps {
    fn subscribe(&mut self) -> Result<Box<dyn Subscription>, NavError> {
        Ok(Box::new(Watch))
    }
}

/// Walking the L at 1.4 m/s with a fix every 5 s.
#[test]
fn walking_an_l_shaped_route_arrives_once() {
    init_logger();
    let geometry = l_shape();
    let route = Route::from_geometry(geometry.clone(), vec![]).unwrap();
    let mut session = NavigationSession::new(NavigationConfig::default(), Screen::default(), Alerts::default());
    session.start(route, &mut Gps).unwrap();

    let events: Vec<PositionEvent> = fixes(&walk(&geometry, 7.0), 5)
        .into_iter()
        .map(PositionEvent::Fix)
        .collect();
    session.drive(events);

    assert_eq!(session.status(), SessionStatus::Arrived);
    let arrivals = &session.arrival().0;
    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0].0, session.trip_id());

    let snapshots = &session.presentation().snapshots;
    for pair in snapshots.windows(2) {
        assert!(pair[1].remaining_distance_meters <= pair[0].remaining_distance_meters);
    }
    let last = snapshots.last().unwrap();
    assert!(last.arrived);
    assert!(last.remaining_distance_meters < 1.0);
    assert_eq!(snapshots.iter().filter(|s| s.arrived).count(), 1);

    // every fix after the first reports walking pace
    let speed = snapshots[1].current_speed_meters_per_second;
    assert!((speed - 1.4).abs() < 0.01, "speed was {}", speed);
    assert!(snapshots[1].eta_seconds.is_some());
}

/// One step at the midpoint; three fixes inside its radius.
#[test]
fn maneuver_step_advances_exactly_once() {
    init_logger();
    let geometry = vec![point(0.0, 0.0), point(0.002, 0.0)];
    let steps = vec![ManeuverStep::new(point(0.001, 0.0), "Turn right")];
    let mut tracker = ProgressTracker::with_route(
        NavigationConfig::default(),
        Route::from_geometry(geometry, steps).unwrap(),
    )
    .unwrap();

    let first = tracker.update(Fix::new(point(0.0, 0.0), start_time())).unwrap();
    assert_eq!(first.current_step_index, 0);
    assert_eq!(first.current_instruction.unwrap().instruction_text, "Turn right");

    let mut indices = Vec::new();
    for (i, lat) in [0.0009, 0.001, 0.0011].iter().enumerate() {
        let at = start_time() + Duration::seconds(10 * (i as i64 + 1));
        let snapshot = tracker.update(Fix::new(point(*lat, 0.0), at)).unwrap();
        indices.push(snapshot.current_step_index);
        assert!(snapshot.current_instruction.is_none());
    }
    assert_eq!(indices, vec![1, 1, 1]);
}

/// Two fixes with the same timestamp.
#[test]
fn zero_elapsed_time_keeps_speed() {
    let mut tracker = ProgressTracker::with_route(
        NavigationConfig::default(),
        Route::from_geometry(l_shape(), vec![]).unwrap(),
    )
    .unwrap();
    tracker.update(Fix::new(point(0.0, 0.0), start_time())).unwrap();
    let t = start_time() + Duration::seconds(10);
    let before = tracker.update(Fix::new(point(0.0001, 0.0), t)).unwrap();
    let after = tracker.update(Fix::new(point(0.0003, 0.0), t)).unwrap();
    assert!(before.current_speed_meters_per_second > 0.0);
    assert_eq!(
        before.current_speed_meters_per_second,
        after.current_speed_meters_per_second
    );

    // repeating the last fix verbatim changes nothing either
    let again = tracker.update(Fix::new(point(0.0003, 0.0), t)).unwrap();
    assert_eq!(again, after);
}

/// A fix with latitude 200.
#[test]
fn out_of_range_fix_leaves_state_unchanged() {
    let mut tracker = ProgressTracker::with_route(
        NavigationConfig::default(),
        Route::from_geometry(l_shape(), vec![]).unwrap(),
    )
    .unwrap();
    tracker.update(Fix::new(point(0.0, 0.0), start_time())).unwrap();
    tracker
        .update(Fix::new(point(0.0001, 0.0), start_time() + Duration::seconds(5)))
        .unwrap();

    let remaining = tracker.remaining_geometry().clone();
    let index = tracker.current_step_index();
    let speed = tracker.current_speed_meters_per_second();
    let last_fix = *tracker.last_fix().unwrap();

    let bad = Fix::new(
        Coordinate::unchecked(200.0, 0.0),
        start_time() + Duration::seconds(10),
    );
    assert!(matches!(tracker.update(bad), Err(NavError::InvalidFix(_))));

    assert_eq!(tracker.remaining_geometry(), &remaining);
    assert_eq!(tracker.current_step_index(), index);
    assert_eq!(tracker.current_speed_meters_per_second(), speed);
    assert_eq!(tracker.last_fix(), Some(&last_fix));
    assert_eq!(tracker.skipped_samples(), 1);
}

/// Resetting mid-trip onto a different route.
#[test]
fn reset_discards_previous_trip() {
    let steps = vec![ManeuverStep::new(point(0.0001, 0.0), "Head north")];
    let mut tracker = ProgressTracker::with_route(
        NavigationConfig::default(),
        Route::from_geometry(l_shape(), steps).unwrap(),
    )
    .unwrap();
    tracker.update(Fix::new(point(0.0, 0.0), start_time())).unwrap();
    tracker
        .update(Fix::new(point(0.0001, 0.0), start_time() + Duration::seconds(5)))
        .unwrap();
    assert_eq!(tracker.current_step_index(), 1);
    assert!(tracker.current_speed_meters_per_second() > 0.0);

    let detour = vec![point(1.0, 1.0), point(1.001, 1.0), point(1.002, 1.001)];
    tracker
        .reset(Route::from_geometry(detour.clone(), vec![]).unwrap())
        .unwrap();

    assert!(tracker.remaining_geometry().iter().eq(detour.iter()));
    assert_eq!(tracker.current_step_index(), 0);
    assert_eq!(tracker.current_speed_meters_per_second(), 0.0);
    assert!(tracker.last_fix().is_none());
    assert_eq!(tracker.trimmed_distance_meters(), 0.0);
}

/// Jittered fixes along the L: the remaining geometry only shrinks, the
/// cursor moves forward by at most one step, and trimmed plus
/// remaining length always adds up to the full route.
#[test]
fn noisy_walk_keeps_progress_monotonic() {
    init_logger();
    let geometry = l_shape();
    let steps: Vec<ManeuverStep> = walk(&geometry, 100.0)
        .into_iter()
        .enumerate()
        .map(|(i, p)| ManeuverStep::new(p, format!("step {}", i)))
        .collect();
    let route = Route::from_geometry(walk(&geometry, 50.0), steps).unwrap();
    let total = haversine::path_length(route.geometry());
    let mut tracker = ProgressTracker::with_route(NavigationConfig::default(), route).unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let mut prev_len = tracker.remaining_geometry().len();
    let mut prev_index = tracker.current_step_index();

    for fix in fixes(&walk(&geometry, 5.0), 3) {
        let jitter = 8.0 * DEG_PER_METER;
        let noisy = point(
            fix.position.lat() + rng.gen_range(-jitter..jitter),
            fix.position.lon() + rng.gen_range(-jitter..jitter),
        );
        tracker.update(Fix::new(noisy, fix.timestamp)).unwrap();

        let len = tracker.remaining_geometry().len();
        let index = tracker.current_step_index();
        assert!(len <= prev_len);
        assert!(index >= prev_index && index <= prev_index + 1);
        let sum = tracker.trimmed_distance_meters() + tracker.remaining_distance_meters();
        assert!((sum - total).abs() < 1e-6);

        prev_len = len;
        prev_index = index;
    }
    assert!(prev_len < 5);
}

/// Losing the position source after start.
#[test]
fn losing_position_source_emits_stopped_notification() {
    let route = Route::from_geometry(l_shape(), vec![]).unwrap();
    let mut session = NavigationSession::new(NavigationConfig::default(), Screen::default(), Alerts::default());
    session.start(route, &mut Gps).unwrap();
    session.drive(vec![
        PositionEvent::Fix(Fix::new(point(0.0, 0.0), start_time())),
        PositionEvent::Lost("permission revoked".to_string()),
        PositionEvent::Fix(Fix::new(point(0.0001, 0.0), start_time() + Duration::seconds(5))),
    ]);

    assert_eq!(session.status(), SessionStatus::Stopped);
    let screen = session.presentation();
    assert_eq!(screen.snapshots.len(), 1);
    assert_eq!(
        screen.stopped,
        vec![(
            SessionStatus::Stopped,
            NavError::PositionSourceUnavailable("permission revoked".to_string())
        )]
    );
    assert!(session.arrival().0.is_empty());
}
