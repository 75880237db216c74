//! Turn a chosen plan into its final itinerary and figures.

use crate::launch::{locate_launch, LaunchSite};
use crate::metrics::{segment_times, trip_metrics, SegmentTime, TripMetrics};
use crate::models::{DronePrediction, Plan, TraversalPoint};
use crate::sequencer::sequence_truck_route;
use crate::spatial::Coordinate;
use crate::traversal::compose_traversal;
use serde::{Deserialize, Serialize};

/// Which path the launch site was searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSource {
    RoadPolyline,
    StraightLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripLayout {
    /// Sequenced truck route, depot first, outbound only
    pub route: Vec<Coordinate>,
    pub path_source: PathSource,
    /// `None` when the drone leg could not be placed
    pub launch: Option<LaunchSite>,
    pub traversal: Vec<TraversalPoint>,
    pub segments: Vec<SegmentTime>,
    pub metrics: Option<TripMetrics>,
}

impl TripLayout {
    /// Midpoint of the launch to drone-delivery leg, where wind is sampled.
    pub fn drone_leg_midpoint(&self, plan: &Plan) -> Option<Coordinate> {
        self.launch
            .map(|site| site.point.midpoint(&plan.drone_delivery.location))
    }

    pub fn has_drone_leg(&self) -> bool {
        self.launch.is_some()
    }
}

/// Sequence the truck stops, place the drone leg, compose the traversal and
/// derive its figures.
///
/// A road polyline with at least two points replaces the straight-line route
/// for the launch search and launch-relative truck distances; otherwise the
/// sequenced route is used unchanged.
pub fn plan_layout(
    plan: &Plan,
    road_polyline: Option<&[Coordinate]>,
    prediction: Option<&DronePrediction>,
) -> TripLayout {
    let route = sequence_truck_route(plan.depot, &plan.truck_deliveries);

    let (path, path_source) = match road_polyline {
        Some(road) if road.len() > 1 => (road, PathSource::RoadPolyline),
        _ => (route.as_slice(), PathSource::StraightLine),
    };

    let target = plan.drone_delivery.location;
    let launch = locate_launch(path, target);
    if launch.is_none() {
        tracing::debug!("drone leg could not be placed; showing truck-only itinerary");
    }

    let traversal = compose_traversal(&route, launch.map(|site| site.point), target);
    let segments = segment_times(&traversal, prediction);
    let metrics = launch
        .as_ref()
        .map(|site| trip_metrics(plan, &route, path, site, prediction));

    TripLayout {
        route,
        path_source,
        launch,
        traversal,
        segments,
        metrics,
    }
}
