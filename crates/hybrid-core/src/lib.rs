pub mod assignment;
pub mod eligibility;
pub mod error;
pub mod launch;
pub mod layout;
pub mod metrics;
pub mod models;
pub mod rules;
pub mod sequencer;
pub mod spatial;
pub mod traversal;

pub use assignment::{optimize_assignment, optimize_assignment_at};
pub use eligibility::{eligible_drones, is_eligible, select_drone};
pub use error::InputError;
pub use launch::{distance_after_launch, distance_to_launch, locate_launch, LaunchSite};
pub use layout::{plan_layout, PathSource, TripLayout};
pub use metrics::{segment_times, trip_metrics, SegmentTime, TravelMode, TripMetrics};
pub use models::{
    Delivery, DeliveryForm, Drone, DronePrediction, FleetSnapshot, FormField, Plan,
    TraversalKind, TraversalPoint,
};
pub use rules::{CarbonModel, DEFAULT_DEPOT};
pub use sequencer::{nearest_neighbor_order, sequence_truck_route};
pub use spatial::{distance, Coordinate, DistanceUnit};
pub use traversal::{compose_traversal, insertion_index};
