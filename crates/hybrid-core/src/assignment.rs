//! Delivery-to-vehicle assignment.
//!
//! Every delivery is tried as the single drone delivery with the rest going
//! by truck. Candidates are scored on hybrid carbon using the per-mile trip
//! estimate; the lowest score wins and ties keep the earlier candidate.

use crate::eligibility::select_drone;
use crate::models::{Delivery, Drone, FleetSnapshot, Plan};
use crate::rules::{
    reduction_pct, travel_minutes, CarbonModel, DRONE_SPEED_PER_HOUR, TRUCK_SPEED_PER_HOUR,
};
use crate::spatial::{distance, round_trip_length, Coordinate};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
struct Candidate<'a> {
    index: usize,
    drone: &'a Drone,
    drone_distance: f64,
    truck_distance: f64,
    hybrid_carbon_kg: f64,
}

/// Pick the delivery/drone pair with the lowest hybrid carbon.
///
/// Returns `None` when no delivery has an eligible drone; every delivery then
/// stays on the truck.
pub fn optimize_assignment(
    deliveries: &[Delivery],
    fleet: &FleetSnapshot,
    depot: Coordinate,
) -> Option<Plan> {
    optimize_assignment_at(deliveries, fleet, depot, Utc::now())
}

/// Same as [`optimize_assignment`] with an explicit creation timestamp.
pub fn optimize_assignment_at(
    deliveries: &[Delivery],
    fleet: &FleetSnapshot,
    depot: Coordinate,
    created_at: DateTime<Utc>,
) -> Option<Plan> {
    let model = CarbonModel::TRIP_ESTIMATE;
    let unit = model.unit;
    let stops: Vec<Coordinate> = deliveries.iter().map(|d| d.location).collect();

    let mut best: Option<Candidate> = None;
    for (index, delivery) in deliveries.iter().enumerate() {
        let Some(drone) = select_drone(delivery, fleet) else {
            tracing::debug!("delivery {} has no eligible drone", index);
            continue;
        };

        let drone_distance = 2.0 * distance(depot, delivery.location, unit);
        let truck_stops: Vec<Coordinate> = stops
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, stop)| *stop)
            .collect();
        let truck_distance = round_trip_length(depot, &truck_stops, unit);
        let hybrid_carbon_kg = model.truck_kg(truck_distance) + model.drone_kg(drone_distance);

        let improves = best
            .as_ref()
            .map_or(true, |current| hybrid_carbon_kg < current.hybrid_carbon_kg);
        if improves {
            best = Some(Candidate {
                index,
                drone,
                drone_distance,
                truck_distance,
                hybrid_carbon_kg,
            });
        }
    }

    let best = best?;
    tracing::debug!(
        "drone {} assigned to delivery {} ({:.2} kg CO2)",
        best.drone.drone_id,
        best.index,
        best.hybrid_carbon_kg
    );

    let truck_only_distance = round_trip_length(depot, &stops, unit);
    let truck_only_carbon_kg = model.truck_kg(truck_only_distance);
    let truck_minutes = travel_minutes(best.truck_distance, TRUCK_SPEED_PER_HOUR);
    let drone_minutes = travel_minutes(best.drone_distance, DRONE_SPEED_PER_HOUR);

    let truck_deliveries = deliveries
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != best.index)
        .map(|(_, d)| *d)
        .collect();

    Some(Plan {
        depot,
        drone: best.drone.clone(),
        drone_delivery: deliveries[best.index],
        truck_deliveries,
        deliveries: deliveries.to_vec(),
        unit,
        drone_distance: best.drone_distance,
        truck_distance: best.truck_distance,
        truck_only_distance,
        hybrid_carbon_kg: best.hybrid_carbon_kg,
        truck_only_carbon_kg,
        carbon_reduction_pct: reduction_pct(truck_only_carbon_kg, best.hybrid_carbon_kg),
        estimated_minutes: truck_minutes.max(drone_minutes),
        truck_only_minutes: travel_minutes(truck_only_distance, TRUCK_SPEED_PER_HOUR),
        created_at,
    })
}
