//! Route Progress Tracking Library.
//! Turns a planned route and a stream of position fixes into live
//! navigation signals: remaining distance, speed, ETA, the next
//! maneuver and arrival.

#[macro_use]
extern crate log;

pub mod types {
    pub mod collaborators;
    pub mod config;
    pub mod coordinate;
    pub mod error;
    pub mod profile;
    pub mod route;
    pub mod snapshot;
    pub mod status;
}

pub mod algorithms {
    pub mod cursor;
    pub mod tracker;
}

pub mod utils {
    pub mod format;
    pub mod haversine;
    pub mod osrm;
}

pub mod session;

pub use algorithms::*;
pub use types::*;
pub use utils::*;
