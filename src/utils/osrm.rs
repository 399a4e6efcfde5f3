//! Decoding of OSRM-style route responses into a [`Route`].
//!
//! Only the fields the tracker needs are read. Coordinates arrive as
//! `[longitude, latitude]` pairs.

use serde::Deserialize;

use crate::coordinate::Coordinate;
use crate::error::NavError;
use crate::route::{ManeuverStep, Route};

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    maneuver: OsrmManeuver,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    location: [f64; 2],
    #[serde(default)]
    instruction: Option<String>,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    modifier: Option<String>,
}

impl OsrmStep {
    /// Uses the provided instruction text, or builds one from the
    /// maneuver type, modifier and street name.
    fn instruction_text(&self) -> String {
        if let Some(text) = &self.maneuver.instruction {
            return text.clone();
        }
        let mut text = match &self.maneuver.modifier {
            Some(modifier) => format!("{} {}", self.maneuver.kind, modifier),
            None => self.maneuver.kind.clone(),
        };
        if !self.name.is_empty() {
            text.push_str(" onto ");
            text.push_str(&self.name);
        }
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => text,
        }
    }
}

fn to_coordinate(pair: [f64; 2]) -> Result<Coordinate, NavError> {
    let [lon, lat] = pair;
    Coordinate::new(lat, lon).map_err(|e| NavError::InvalidRoute(e.to_string()))
}

/// Parses the first route of an OSRM response.
///
/// # Returns
/// A validated [`Route`], [`NavError::RouteSourceUnavailable`] when the
/// upstream reported failure or returned no routes, or
/// [`NavError::InvalidRoute`] when the payload is malformed.
pub fn parse_route(json: &str) -> Result<Route, NavError> {
    let response: OsrmResponse =
        serde_json::from_str(json).map_err(|e| NavError::InvalidRoute(e.to_string()))?;

    if response.code != "Ok" {
        error!("routing failed with code {}", response.code);
        return Err(NavError::RouteSourceUnavailable(format!(
            "{}: {}",
            response.code,
            response.message.unwrap_or_default()
        )));
    }
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| NavError::RouteSourceUnavailable("no routes returned".to_string()))?;

    let geometry = route
        .geometry
        .coordinates
        .into_iter()
        .map(to_coordinate)
        .collect::<Result<Vec<_>, _>>()?;

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .map(|step| {
            Ok(ManeuverStep::new(
                to_coordinate(step.maneuver.location)?,
                step.instruction_text(),
            ))
        })
        .collect::<Result<Vec<_>, NavError>>()?;

    debug!(
        "decoded route: {} points, {} steps, {} m, {} s",
        geometry.len(),
        steps.len(),
        route.distance,
        route.duration
    );
    Route::new(geometry, steps, route.distance, route.duration)
}
