//! Greedy truck route ordering.

use crate::models::Delivery;
use crate::spatial::{distance, Coordinate, DistanceUnit};

/// Visit order of `deliveries` by repeatedly driving to the nearest unvisited stop.
///
/// Returns indices into `deliveries`. Equal distances keep the stop that comes
/// first among the remaining ones.
pub fn nearest_neighbor_order(depot: Coordinate, deliveries: &[Delivery]) -> Vec<usize> {
    let mut unvisited: Vec<usize> = (0..deliveries.len()).collect();
    let mut order = Vec::with_capacity(deliveries.len());
    let mut current = depot;

    while !unvisited.is_empty() {
        let mut min_pos = 0;
        let mut min_dist = f64::INFINITY;
        for (pos, &index) in unvisited.iter().enumerate() {
            let d = distance(current, deliveries[index].location, DistanceUnit::Kilometers);
            if d < min_dist {
                min_dist = d;
                min_pos = pos;
            }
        }
        let next = unvisited.remove(min_pos);
        current = deliveries[next].location;
        order.push(next);
    }

    order
}

/// Outbound truck route: the depot followed by every delivery in
/// nearest-neighbor order. No return leg is appended.
pub fn sequence_truck_route(depot: Coordinate, deliveries: &[Delivery]) -> Vec<Coordinate> {
    std::iter::once(depot)
        .chain(
            nearest_neighbor_order(depot, deliveries)
                .into_iter()
                .map(|index| deliveries[index].location),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> Delivery {
        Delivery {
            weight_kg: 1.0,
            location: Coordinate::new(lat, lon),
        }
    }

    #[test]
    fn empty_route_is_just_the_depot() {
        let depot = Coordinate::new(12.9716, 77.5946);
        assert_eq!(sequence_truck_route(depot, &[]), vec![depot]);
    }

    #[test]
    fn walks_nearest_first() {
        let depot = Coordinate::new(0.0, 0.0);
        let deliveries = vec![at(0.0, 3.0), at(0.0, 1.0), at(0.0, 2.0)];
        assert_eq!(nearest_neighbor_order(depot, &deliveries), vec![1, 2, 0]);
        assert_eq!(
            sequence_truck_route(depot, &deliveries),
            vec![
                depot,
                Coordinate::new(0.0, 1.0),
                Coordinate::new(0.0, 2.0),
                Coordinate::new(0.0, 3.0)
            ]
        );
    }

    #[test]
    fn ties_keep_list_order() {
        let depot = Coordinate::new(0.0, 0.0);
        // Equidistant from the depot: north first because it is listed first.
        let deliveries = vec![at(1.0, 0.0), at(-1.0, 0.0)];
        assert_eq!(nearest_neighbor_order(depot, &deliveries), vec![0, 1]);
    }

    #[test]
    fn greedy_is_not_globally_optimal() {
        let depot = Coordinate::new(0.0, 0.0);
        let deliveries = vec![at(0.0, -1.5), at(0.0, 1.0), at(0.0, 2.0)];
        // Nearest first goes east, then has to double back west.
        assert_eq!(nearest_neighbor_order(depot, &deliveries), vec![1, 2, 0]);
    }
}
