//! Fixed model constants: eligibility thresholds, vehicle speeds, emission factors.

use crate::spatial::{Coordinate, DistanceUnit};
use serde::{Deserialize, Serialize};

/// Minimum battery percentage a drone needs to be dispatched.
pub const MIN_DRONE_BATTERY_PCT: f64 = 20.0;

/// Truck speed in distance units per hour.
pub const TRUCK_SPEED_PER_HOUR: f64 = 30.0;

/// Drone speed in distance units per hour.
pub const DRONE_SPEED_PER_HOUR: f64 = 40.0;

/// Interpolation steps per path segment when searching for the launch site.
pub const LAUNCH_SAMPLES_PER_SEGMENT: usize = 50;

/// Default depot (Bangalore).
pub const DEFAULT_DEPOT: Coordinate = Coordinate::new(12.9716, 77.5946);

/// Minutes needed to cover `distance` at `speed_per_hour`.
pub fn travel_minutes(distance: f64, speed_per_hour: f64) -> f64 {
    distance / speed_per_hour * 60.0
}

/// Emission factors paired with the unit they are expressed per.
///
/// Distances fed into a model must be computed in `model.unit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonModel {
    pub unit: DistanceUnit,
    /// kg CO2 per unit of truck travel
    pub truck_kg_per_unit: f64,
    /// kg CO2 per unit of drone travel
    pub drone_kg_per_unit: f64,
}

impl CarbonModel {
    /// Per-mile factors used to score assignment candidates.
    pub const TRIP_ESTIMATE: CarbonModel = CarbonModel {
        unit: DistanceUnit::Miles,
        truck_kg_per_unit: 1.2,
        drone_kg_per_unit: 0.1,
    };

    /// Per-kilometer factors used for the final route figures.
    pub const ROUTE_ESTIMATE: CarbonModel = CarbonModel {
        unit: DistanceUnit::Kilometers,
        truck_kg_per_unit: 1.746,
        drone_kg_per_unit: 0.002,
    };

    pub fn truck_kg(&self, distance: f64) -> f64 {
        distance * self.truck_kg_per_unit
    }

    pub fn drone_kg(&self, distance: f64) -> f64 {
        distance * self.drone_kg_per_unit
    }
}

/// Percentage reduction of `hybrid` relative to `baseline`; 0 for a zero baseline.
pub fn reduction_pct(baseline: f64, hybrid: f64) -> f64 {
    if baseline > 0.0 {
        (baseline - hybrid) / baseline * 100.0
    } else {
        0.0
    }
}
