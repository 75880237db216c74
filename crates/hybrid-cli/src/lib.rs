//! Hybrid CLI - command line planner for truck and drone trips.
//!
//! The `hybrid-trip` binary reads a request file, plans the trip, prints a
//! report and optionally commits it:
//! - `hybrid-trip plan --request FILE`
//! - `hybrid-trip replan --index N`

pub mod config;
pub mod planner;
pub mod report;
pub mod request;

pub use config::Config;
pub use planner::{plan_trip, Collaborators, PlannedTrip};
pub use request::TripRequest;
