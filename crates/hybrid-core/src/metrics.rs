//! Per-segment travel time and hybrid vs truck-only comparison figures.
//!
//! All distances here use the per-kilometer route estimate.

use crate::launch::{distance_after_launch, distance_to_launch, LaunchSite};
use crate::models::{DronePrediction, Plan, TraversalKind, TraversalPoint};
use crate::rules::{
    reduction_pct, travel_minutes, CarbonModel, DRONE_SPEED_PER_HOUR, TRUCK_SPEED_PER_HOUR,
};
use crate::spatial::{distance, path_length, Coordinate, DistanceUnit};
use serde::{Deserialize, Serialize};

/// How the duration of one traversal segment was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Truck,
    Drone,
    /// Drone segment timed by the external predictor
    Predicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vehicle {
    Truck,
    Drone,
}

fn leg_vehicle(from: TraversalKind, to: TraversalKind) -> Vehicle {
    use TraversalKind::*;
    match (from, to) {
        (Launch, DroneDelivery) | (DroneDelivery, Landing) => Vehicle::Drone,
        (Depot | TruckStop | Landing, _) => Vehicle::Truck,
        (Launch, Depot | TruckStop | Launch | Landing) => Vehicle::Truck,
        (DroneDelivery, Depot | TruckStop | Launch | DroneDelivery) => Vehicle::Truck,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentTime {
    /// Label of the segment's starting point
    pub from: usize,
    /// Label of the segment's end point
    pub to: usize,
    pub mode: TravelMode,
    pub minutes: f64,
}

/// Time for every consecutive pair of traversal points.
///
/// A usable prediction is applied in full to each of the two drone halves.
pub fn segment_times(
    traversal: &[TraversalPoint],
    prediction: Option<&DronePrediction>,
) -> Vec<SegmentTime> {
    let unit = CarbonModel::ROUTE_ESTIMATE.unit;
    let predicted = prediction.and_then(DronePrediction::usable_minutes);

    traversal
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let leg = distance(a.location, b.location, unit);
            let (mode, minutes) = match (leg_vehicle(a.kind, b.kind), predicted) {
                (Vehicle::Drone, Some(minutes)) => (TravelMode::Predicted, minutes),
                (Vehicle::Drone, None) => {
                    (TravelMode::Drone, travel_minutes(leg, DRONE_SPEED_PER_HOUR))
                }
                (Vehicle::Truck, _) => {
                    (TravelMode::Truck, travel_minutes(leg, TRUCK_SPEED_PER_HOUR))
                }
            };
            SegmentTime {
                from: a.label,
                to: b.label,
                mode,
                minutes,
            }
        })
        .collect()
}

/// Minutes for the truck to drive `route` end to end.
pub fn route_truck_minutes(route: &[Coordinate], unit: DistanceUnit) -> f64 {
    travel_minutes(path_length(route, unit), TRUCK_SPEED_PER_HOUR)
}

/// Final comparison of the hybrid trip against serving everything by truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    pub unit: DistanceUnit,
    pub truck_distance_to_launch: f64,
    pub truck_distance_after_launch: f64,
    pub truck_minutes_to_launch: f64,
    pub truck_minutes_after_launch: f64,
    /// One-way launch to delivery distance
    pub drone_leg_distance: f64,
    /// Full drone out-and-back duration
    pub drone_minutes: f64,
    pub used_prediction: bool,
    pub total_minutes: f64,
    pub truck_only_minutes: f64,
    /// Truck-only minus hybrid; negative when the hybrid trip is slower
    pub time_saved_minutes: f64,
    pub truck_only_distance: f64,
    pub hybrid_truck_distance: f64,
    pub truck_only_carbon_kg: f64,
    pub hybrid_carbon_kg: f64,
    pub carbon_saved_kg: f64,
    pub carbon_reduction_pct: f64,
}

/// Compute trip metrics for a placed drone leg.
///
/// * `route` - sequenced truck route (depot first), used for the truck-only time
/// * `path` - path the launch site was located on (road polyline or `route`)
/// * `launch` - launch site on `path`
pub fn trip_metrics(
    plan: &Plan,
    route: &[Coordinate],
    path: &[Coordinate],
    launch: &LaunchSite,
    prediction: Option<&DronePrediction>,
) -> TripMetrics {
    let model = CarbonModel::ROUTE_ESTIMATE;
    let unit = model.unit;
    let target = plan.drone_delivery.location;

    let truck_distance_to_launch = distance_to_launch(path, launch, unit);
    let truck_distance_after_launch = distance_after_launch(path, launch, unit);
    let truck_minutes_to_launch = travel_minutes(truck_distance_to_launch, TRUCK_SPEED_PER_HOUR);
    let truck_minutes_after_launch =
        travel_minutes(truck_distance_after_launch, TRUCK_SPEED_PER_HOUR);

    let drone_leg_distance = distance(launch.point, target, unit);
    let predicted = prediction.and_then(DronePrediction::usable_trip_minutes);
    let drone_minutes = predicted
        .unwrap_or_else(|| travel_minutes(2.0 * drone_leg_distance, DRONE_SPEED_PER_HOUR));
    let total_minutes = truck_minutes_to_launch + drone_minutes.max(truck_minutes_after_launch);

    let truck_only_minutes = route_truck_minutes(route, unit);

    // Truck-only: depot, every truck stop in plan order, then the drone's stop.
    let mut truck_only_stops = vec![plan.depot];
    truck_only_stops.extend(plan.truck_deliveries.iter().map(|d| d.location));
    truck_only_stops.push(target);
    let truck_only_distance = path_length(&truck_only_stops, unit);

    // Hybrid truck: depot, truck stops in plan order, over to the launch point,
    // then on to the stop at the launch segment if there is one.
    let mut hybrid_stops = vec![plan.depot];
    hybrid_stops.extend(plan.truck_deliveries.iter().map(|d| d.location));
    hybrid_stops.push(launch.point);
    if let Some(next) = plan.truck_deliveries.get(launch.segment_index) {
        hybrid_stops.push(next.location);
    }
    let hybrid_truck_distance = path_length(&hybrid_stops, unit);

    let truck_only_carbon_kg = model.truck_kg(truck_only_distance);
    let hybrid_carbon_kg = model.truck_kg(hybrid_truck_distance) + model.drone_kg(drone_leg_distance);

    TripMetrics {
        unit,
        truck_distance_to_launch,
        truck_distance_after_launch,
        truck_minutes_to_launch,
        truck_minutes_after_launch,
        drone_leg_distance,
        drone_minutes,
        used_prediction: predicted.is_some(),
        total_minutes,
        truck_only_minutes,
        time_saved_minutes: truck_only_minutes - total_minutes,
        truck_only_distance,
        hybrid_truck_distance,
        truck_only_carbon_kg,
        hybrid_carbon_kg,
        carbon_saved_kg: truck_only_carbon_kg - hybrid_carbon_kg,
        carbon_reduction_pct: reduction_pct(truck_only_carbon_kg, hybrid_carbon_kg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Delivery, Drone};
    use crate::spatial::EARTH_RADIUS_KM;
    use chrono::Utc;

    fn point(kind: TraversalKind, label: usize, lat: f64, lon: f64) -> TraversalPoint {
        TraversalPoint {
            kind,
            location: Coordinate::new(lat, lon),
            label,
        }
    }

    fn km_north(km: f64) -> f64 {
        (km / EARTH_RADIUS_KM).to_degrees()
    }

    fn plan(depot: Coordinate, drone_at: Coordinate, truck: &[Coordinate]) -> Plan {
        let truck_deliveries: Vec<Delivery> = truck
            .iter()
            .map(|c| Delivery {
                weight_kg: 1.0,
                location: *c,
            })
            .collect();
        let drone_delivery = Delivery {
            weight_kg: 1.0,
            location: drone_at,
        };
        let mut deliveries = vec![drone_delivery];
        deliveries.extend(truck_deliveries.iter().copied());
        Plan {
            depot,
            drone: Drone {
                drone_id: "D1".into(),
                payload_capacity_kg: 5.0,
                battery_pct: 90.0,
                available: true,
            },
            drone_delivery,
            truck_deliveries,
            deliveries,
            unit: DistanceUnit::Miles,
            drone_distance: 0.0,
            truck_distance: 0.0,
            truck_only_distance: 0.0,
            hybrid_carbon_kg: 0.0,
            truck_only_carbon_kg: 0.0,
            carbon_reduction_pct: 0.0,
            estimated_minutes: 0.0,
            truck_only_minutes: 0.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn segment_modes_follow_point_kinds() {
        let traversal = vec![
            point(TraversalKind::Depot, 0, 0.0, 0.0),
            point(TraversalKind::Launch, 1, 0.0, 0.1),
            point(TraversalKind::DroneDelivery, 2, 0.1, 0.1),
            point(TraversalKind::Landing, 3, 0.0, 0.1),
            point(TraversalKind::TruckStop, 4, 0.0, 0.2),
        ];
        let times = segment_times(&traversal, None);
        let modes: Vec<TravelMode> = times.iter().map(|t| t.mode).collect();
        assert_eq!(
            modes,
            vec![
                TravelMode::Truck,
                TravelMode::Drone,
                TravelMode::Drone,
                TravelMode::Truck
            ]
        );
        assert_eq!((times[1].from, times[1].to), (1, 2));

        let leg = distance(
            traversal[1].location,
            traversal[2].location,
            DistanceUnit::Kilometers,
        );
        assert!((times[1].minutes - leg / 40.0 * 60.0).abs() < 1e-9);
    }

    #[test]
    fn prediction_applies_to_each_drone_half() {
        let traversal = vec![
            point(TraversalKind::Depot, 0, 0.0, 0.0),
            point(TraversalKind::Launch, 1, 0.0, 0.0),
            point(TraversalKind::DroneDelivery, 2, 0.1, 0.1),
            point(TraversalKind::Landing, 3, 0.0, 0.0),
        ];
        let prediction = DronePrediction {
            minutes: 14.0,
            trip_minutes: None,
            drone_id: None,
        };
        let times = segment_times(&traversal, Some(&prediction));
        assert_eq!(times[1].mode, TravelMode::Predicted);
        assert_eq!(times[1].minutes, 14.0);
        assert_eq!(times[2].minutes, 14.0);
        assert_eq!(times[0].mode, TravelMode::Truck);
    }

    #[test]
    fn truck_only_time_uses_forward_legs() {
        // depot -> A is 10 km, A -> B is 15 km: (10 + 15) / 30 * 60 = 50 minutes.
        let depot = Coordinate::new(0.0, 0.0);
        let a = Coordinate::new(km_north(10.0), 0.0);
        let b = Coordinate::new(km_north(25.0), 0.0);
        let minutes = route_truck_minutes(&[depot, a, b], DistanceUnit::Kilometers);
        assert!((minutes - 50.0).abs() < 1e-6, "{minutes}");
    }

    #[test]
    fn total_time_overlaps_drone_and_truck() {
        let depot = Coordinate::new(0.0, 0.0);
        let stop = Coordinate::new(km_north(30.0), 0.0);
        let target = Coordinate::new(km_north(15.0), 0.05);
        let route = vec![depot, stop];
        let launch = LaunchSite {
            point: depot.lerp(&stop, 0.5),
            segment_index: 0,
            fraction: 0.5,
        };
        let plan = plan(depot, target, &[stop]);

        let metrics = trip_metrics(&plan, &route, &route, &launch, None);
        assert!((metrics.truck_minutes_to_launch - 30.0).abs() < 1e-6);
        assert!((metrics.truck_minutes_after_launch - 30.0).abs() < 1e-6);
        let expected_drone = 2.0 * metrics.drone_leg_distance / 40.0 * 60.0;
        assert!((metrics.drone_minutes - expected_drone).abs() < 1e-9);
        let expected_total = 30.0 + expected_drone.max(30.0);
        assert!((metrics.total_minutes - expected_total).abs() < 1e-6);
        assert!((metrics.truck_only_minutes - 60.0).abs() < 1e-6);
        assert!(!metrics.used_prediction);

        let slow = DronePrediction {
            minutes: 45.0,
            trip_minutes: Some(90.0),
            drone_id: Some("D9".into()),
        };
        let metrics = trip_metrics(&plan, &route, &route, &launch, Some(&slow));
        assert!(metrics.used_prediction);
        assert!((metrics.total_minutes - 120.0).abs() < 1e-6);
        // Hybrid is slower; reported as a negative saving.
        assert!((metrics.time_saved_minutes + 60.0).abs() < 1e-6);
    }

    #[test]
    fn segment_only_prediction_keeps_geometric_trip_time() {
        let depot = Coordinate::new(0.0, 0.0);
        let stop = Coordinate::new(km_north(30.0), 0.0);
        let target = Coordinate::new(km_north(15.0), 0.05);
        let route = vec![depot, stop];
        let launch = LaunchSite {
            point: depot.lerp(&stop, 0.5),
            segment_index: 0,
            fraction: 0.5,
        };
        let plan = plan(depot, target, &[stop]);
        let segment_only = DronePrediction {
            minutes: 90.0,
            trip_minutes: None,
            drone_id: None,
        };

        let metrics = trip_metrics(&plan, &route, &route, &launch, Some(&segment_only));
        let expected_drone = 2.0 * metrics.drone_leg_distance / 40.0 * 60.0;
        assert!(!metrics.used_prediction);
        assert!((metrics.drone_minutes - expected_drone).abs() < 1e-9);
    }

    #[test]
    fn carbon_uses_route_estimate_factors() {
        let depot = Coordinate::new(0.0, 0.0);
        let stop = Coordinate::new(km_north(10.0), 0.0);
        let target = Coordinate::new(km_north(10.0), 0.1);
        let route = vec![depot, stop];
        let launch = LaunchSite {
            point: stop,
            segment_index: 0,
            fraction: 1.0,
        };
        let plan = plan(depot, target, &[stop]);
        let metrics = trip_metrics(&plan, &route, &route, &launch, None);

        let leg = distance(stop, target, DistanceUnit::Kilometers);
        assert!((metrics.truck_only_distance - (10.0 + leg)).abs() < 1e-6);
        // depot -> stop -> launch(stop) -> stop: the stop at the launch segment is revisited.
        assert!((metrics.hybrid_truck_distance - 10.0).abs() < 1e-6);
        assert!((metrics.truck_only_carbon_kg - (10.0 + leg) * 1.746).abs() < 1e-6);
        assert!((metrics.hybrid_carbon_kg - (10.0 * 1.746 + leg * 0.002)).abs() < 1e-6);
        assert!(metrics.carbon_reduction_pct > 0.0);
        assert!(
            (metrics.carbon_saved_kg - (metrics.truck_only_carbon_kg - metrics.hybrid_carbon_kg))
                .abs()
                < 1e-12
        );
    }
}
