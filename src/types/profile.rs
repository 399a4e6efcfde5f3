//! Definition for the [`VehicleProfile`] type, implemented by an enum.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The enumerated set of ways a traveler can follow a route.
///
/// The string form (`"car"`, `"bike"`, ...) round-trips through
/// `FromStr`/`Display`.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleProfile {
    #[default]
    Car,
    Bike,
    Walk,
    Truck,
}

impl VehicleProfile {
    /// Default upstream routing-profile name. A route source may use
    /// its own mapping instead.
    pub fn routing_profile(&self) -> &'static str {
        match self {
            VehicleProfile::Car | VehicleProfile::Truck => "driving",
            VehicleProfile::Bike => "cycling",
            VehicleProfile::Walk => "walking",
        }
    }
}
