//! Drone eligibility for a single delivery.

use crate::models::{Delivery, Drone, FleetSnapshot};
use crate::rules::MIN_DRONE_BATTERY_PCT;

/// A drone can fly a delivery when it is available, can lift the parcel,
/// and has at least the minimum battery charge.
pub fn is_eligible(drone: &Drone, delivery: &Delivery) -> bool {
    drone.available
        && drone.payload_capacity_kg >= delivery.weight_kg
        && drone.battery_pct >= MIN_DRONE_BATTERY_PCT
}

/// All drones able to fly `delivery`, in fleet order. Empty is a normal outcome.
pub fn eligible_drones<'a>(delivery: &Delivery, fleet: &'a FleetSnapshot) -> Vec<&'a Drone> {
    fleet
        .drones()
        .iter()
        .filter(|drone| is_eligible(drone, delivery))
        .collect()
}

/// The drone picked for `delivery`: the first eligible one in fleet order.
pub fn select_drone<'a>(delivery: &Delivery, fleet: &'a FleetSnapshot) -> Option<&'a Drone> {
    fleet
        .drones()
        .iter()
        .find(|drone| is_eligible(drone, delivery))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Coordinate;

    fn drone(id: &str, payload: f64, battery: f64, available: bool) -> Drone {
        Drone {
            drone_id: id.to_string(),
            payload_capacity_kg: payload,
            battery_pct: battery,
            available,
        }
    }

    fn parcel(weight: f64) -> Delivery {
        Delivery {
            weight_kg: weight,
            location: Coordinate::new(12.98, 77.60),
        }
    }

    #[test]
    fn filters_on_payload_battery_and_availability() {
        let fleet = FleetSnapshot::new(vec![
            drone("light", 2.0, 90.0, true),
            drone("flat", 10.0, 19.9, true),
            drone("busy", 10.0, 90.0, false),
            drone("ok", 10.0, 20.0, true),
        ]);
        let ids: Vec<&str> = eligible_drones(&parcel(5.0), &fleet)
            .into_iter()
            .map(|d| d.drone_id.as_str())
            .collect();
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn payload_equal_to_weight_is_enough() {
        assert!(is_eligible(&drone("exact", 5.0, 50.0, true), &parcel(5.0)));
    }

    #[test]
    fn selection_is_first_in_fleet_order() {
        let fleet = FleetSnapshot::new(vec![
            drone("first", 6.0, 30.0, true),
            drone("roomier", 50.0, 100.0, true),
        ]);
        assert_eq!(
            select_drone(&parcel(5.0), &fleet).map(|d| d.drone_id.as_str()),
            Some("first")
        );
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let fleet = FleetSnapshot::new(vec![drone("tiny", 1.0, 100.0, true)]);
        assert!(eligible_drones(&parcel(5.0), &fleet).is_empty());
        assert!(select_drone(&parcel(5.0), &fleet).is_none());
    }
}
