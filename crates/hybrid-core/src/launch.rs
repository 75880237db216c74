//! Launch/landing site search along the truck path.
//!
//! The drone departs from and returns to the same point: the sampled point on
//! the truck path closest to the drone delivery.

use crate::rules::LAUNCH_SAMPLES_PER_SEGMENT;
use crate::spatial::{distance, Coordinate, DistanceUnit};
use serde::{Deserialize, Serialize};

/// Where along a path the drone leaves and rejoins the truck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchSite {
    pub point: Coordinate,
    /// Index of the path segment `path[i] -> path[i + 1]` the point lies on
    pub segment_index: usize,
    /// Position within that segment, 0 at its start and 1 at its end
    pub fraction: f64,
}

/// Find the closest approach of `path` to `target`.
///
/// Each segment is sampled at `LAUNCH_SAMPLES_PER_SEGMENT + 1` evenly spaced
/// fractions including both endpoints. The first sample at the global
/// minimum wins. Returns `None` for paths with fewer than two points or when
/// no sample yields a finite distance.
pub fn locate_launch(path: &[Coordinate], target: Coordinate) -> Option<LaunchSite> {
    locate_launch_with_samples(path, target, LAUNCH_SAMPLES_PER_SEGMENT)
}

pub fn locate_launch_with_samples(
    path: &[Coordinate],
    target: Coordinate,
    samples_per_segment: usize,
) -> Option<LaunchSite> {
    if path.len() < 2 || !target.is_finite() {
        return None;
    }
    let samples = samples_per_segment.max(1);

    let mut best: Option<LaunchSite> = None;
    let mut min_dist = f64::INFINITY;
    for (segment_index, segment) in path.windows(2).enumerate() {
        for step in 0..=samples {
            let fraction = step as f64 / samples as f64;
            let point = segment[0].lerp(&segment[1], fraction);
            let d = distance(point, target, DistanceUnit::Kilometers);
            if d < min_dist {
                min_dist = d;
                best = Some(LaunchSite {
                    point,
                    segment_index,
                    fraction,
                });
            }
        }
    }

    if let Some(site) = &best {
        tracing::debug!(
            "launch site on segment {} at {:.2} ({:.3} km from target)",
            site.segment_index,
            site.fraction,
            min_dist
        );
    }
    best
}

fn segment_length(path: &[Coordinate], index: usize, unit: DistanceUnit) -> f64 {
    match (path.get(index), path.get(index + 1)) {
        (Some(start), Some(end)) => distance(*start, *end, unit),
        _ => 0.0,
    }
}

/// Truck distance from the start of `path` to the launch site.
///
/// Full segments before the launch segment plus the launch fraction of the
/// launch segment's length.
pub fn distance_to_launch(path: &[Coordinate], site: &LaunchSite, unit: DistanceUnit) -> f64 {
    let before: f64 = (0..site.segment_index)
        .map(|index| segment_length(path, index, unit))
        .sum();
    before + segment_length(path, site.segment_index, unit) * site.fraction
}

/// Truck distance from the launch site to the end of `path`.
pub fn distance_after_launch(path: &[Coordinate], site: &LaunchSite, unit: DistanceUnit) -> f64 {
    let remainder = segment_length(path, site.segment_index, unit) * (1.0 - site.fraction);
    let after: f64 = (site.segment_index + 1..path.len().saturating_sub(1))
        .map(|index| segment_length(path, index, unit))
        .sum();
    remainder + after
}
