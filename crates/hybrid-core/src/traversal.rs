//! Traversal composition: splice the drone side-trip into the truck itinerary.

use crate::models::{TraversalKind, TraversalPoint};
use crate::spatial::{distance, Coordinate, DistanceUnit};

/// Position in `route` after which the drone side-trip is listed.
///
/// The side-trip follows the route segment whose midpoint is closest to
/// `launch`. A route without segments inserts right after the depot.
pub fn insertion_index(route: &[Coordinate], launch: Coordinate) -> usize {
    let mut insert_at = 1;
    let mut min_dist = f64::INFINITY;
    for (index, segment) in route.windows(2).enumerate() {
        let mid = segment[0].midpoint(&segment[1]);
        let d = distance(launch, mid, DistanceUnit::Kilometers);
        if d < min_dist {
            min_dist = d;
            insert_at = index + 1;
        }
    }
    insert_at
}

/// Build the labeled traversal `[Depot, TruckStop*, Launch, DroneDelivery, Landing, TruckStop*]`.
///
/// `route` is the sequenced truck route starting at the depot. Without a
/// launch site the drone triple is omitted and the itinerary is truck only.
/// Labels count up from 0 in the final order; no return to the depot is added.
pub fn compose_traversal(
    route: &[Coordinate],
    launch: Option<Coordinate>,
    drone_target: Coordinate,
) -> Vec<TraversalPoint> {
    let Some((depot, stops)) = route.split_first() else {
        return Vec::new();
    };

    let mut kinds: Vec<(TraversalKind, Coordinate)> = Vec::with_capacity(route.len() + 3);
    kinds.push((TraversalKind::Depot, *depot));

    match launch {
        Some(launch) => {
            let split = insertion_index(route, launch) - 1;
            let (before, after) = stops.split_at(split.min(stops.len()));
            kinds.extend(before.iter().map(|stop| (TraversalKind::TruckStop, *stop)));
            kinds.push((TraversalKind::Launch, launch));
            kinds.push((TraversalKind::DroneDelivery, drone_target));
            kinds.push((TraversalKind::Landing, launch));
            kinds.extend(after.iter().map(|stop| (TraversalKind::TruckStop, *stop)));
        }
        None => {
            kinds.extend(stops.iter().map(|stop| (TraversalKind::TruckStop, *stop)));
        }
    }

    kinds
        .into_iter()
        .enumerate()
        .map(|(label, (kind, location))| TraversalPoint {
            kind,
            location,
            label,
        })
        .collect()
}
