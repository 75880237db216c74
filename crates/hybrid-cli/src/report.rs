//! Plain-text trip report.

use crate::planner::PlannedTrip;
use hybrid_core::{Delivery, PathSource, TravelMode, TraversalPoint};
use std::fmt;

/// Render minutes as `H hr M min S sec`, omitting leading zero components.
/// Negative or non-finite input renders `N/A`.
pub fn format_minutes(minutes: f64) -> String {
    let total_seconds = (minutes * 60.0).round();
    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return "N/A".to_string();
    }
    let total_seconds = total_seconds as u64;
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{} hr {} min {} sec", hours, mins, seconds)
    } else if mins > 0 {
        format!("{} min {} sec", mins, seconds)
    } else {
        format!("{} sec", seconds)
    }
}

/// Like [`format_minutes`] but keeps the sign, for savings that may be negative.
pub fn format_signed_minutes(minutes: f64) -> String {
    if !minutes.is_finite() {
        return "N/A".to_string();
    }
    if minutes < 0.0 {
        format!("-{}", format_minutes(-minutes))
    } else {
        format_minutes(minutes)
    }
}

fn step(point: &TraversalPoint) -> String {
    format!(
        "{:>2}. {:<14} ({:.5}, {:.5})",
        point.step_letter(),
        point.kind.display_name(),
        point.location.lat,
        point.location.lon
    )
}

fn mode_name(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Truck => "truck",
        TravelMode::Drone => "drone",
        TravelMode::Predicted => "drone, predicted",
    }
}

fn letter_for(traversal: &[TraversalPoint], label: usize) -> String {
    traversal
        .iter()
        .find(|point| point.label == label)
        .map(TraversalPoint::step_letter)
        .unwrap_or_else(|| label.to_string())
}

/// Full report for a planned trip.
pub struct TripReport<'a>(pub &'a PlannedTrip);

impl fmt::Display for TripReport<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trip = self.0;
        let plan = &trip.plan;
        let layout = &trip.layout;
        let unit = plan.unit.abbreviation();

        writeln!(out, "Hybrid trip plan ({})", plan.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(
            out,
            "Depot: ({:.5}, {:.5})",
            plan.depot.lat, plan.depot.lon
        )?;
        writeln!(
            out,
            "Drone {}: {:.2} kg to ({:.5}, {:.5})",
            plan.drone.drone_id,
            plan.drone_delivery.weight_kg,
            plan.drone_delivery.location.lat,
            plan.drone_delivery.location.lon
        )?;
        writeln!(out, "Truck deliveries: {}", plan.truck_deliveries.len())?;

        writeln!(out, "\nTrip estimate")?;
        writeln!(
            out,
            "  Drone distance:      {:.2} {}",
            plan.drone_distance, unit
        )?;
        writeln!(
            out,
            "  Truck distance:      {:.2} {} (truck only {:.2} {})",
            plan.truck_distance, unit, plan.truck_only_distance, unit
        )?;
        writeln!(
            out,
            "  Carbon:              {:.2} kg (truck only {:.2} kg, {:.1}% reduction)",
            plan.hybrid_carbon_kg, plan.truck_only_carbon_kg, plan.carbon_reduction_pct
        )?;
        writeln!(
            out,
            "  Estimated time:      {} (truck only {})",
            format_minutes(plan.estimated_minutes),
            format_minutes(plan.truck_only_minutes)
        )?;

        let path = match layout.path_source {
            PathSource::RoadPolyline => "road route",
            PathSource::StraightLine => "straight-line route",
        };
        writeln!(out, "\nItinerary ({})", path)?;
        for point in &layout.traversal {
            writeln!(out, "  {}", step(point))?;
        }
        if !layout.has_drone_leg() {
            writeln!(
                out,
                "  Drone leg could not be placed on the truck route; truck-only itinerary shown."
            )?;
        }

        if !layout.segments.is_empty() {
            writeln!(out, "\nSegments")?;
            for segment in &layout.segments {
                writeln!(
                    out,
                    "  {} -> {}  {:<16} {}",
                    letter_for(&layout.traversal, segment.from),
                    letter_for(&layout.traversal, segment.to),
                    mode_name(segment.mode),
                    format_minutes(segment.minutes)
                )?;
            }
        }

        if let Some(metrics) = &layout.metrics {
            let unit = metrics.unit.abbreviation();
            writeln!(out, "\nRoute figures")?;
            writeln!(
                out,
                "  Truck to launch:     {:.2} {} / {}",
                metrics.truck_distance_to_launch,
                unit,
                format_minutes(metrics.truck_minutes_to_launch)
            )?;
            writeln!(
                out,
                "  Truck after launch:  {:.2} {} / {}",
                metrics.truck_distance_after_launch,
                unit,
                format_minutes(metrics.truck_minutes_after_launch)
            )?;
            let drone_source = if metrics.used_prediction {
                "predicted"
            } else {
                "estimated"
            };
            writeln!(
                out,
                "  Drone leg:           {:.2} {} one way / {} ({})",
                metrics.drone_leg_distance,
                unit,
                format_minutes(metrics.drone_minutes),
                drone_source
            )?;
            writeln!(
                out,
                "  Total trip time:     {}",
                format_minutes(metrics.total_minutes)
            )?;
            writeln!(
                out,
                "  Truck-only time:     {}",
                format_minutes(metrics.truck_only_minutes)
            )?;
            writeln!(
                out,
                "  Time saved:          {}",
                format_signed_minutes(metrics.time_saved_minutes)
            )?;
            writeln!(
                out,
                "  Carbon:              {:.3} kg (truck only {:.3} kg, saved {:.3} kg, {:.1}%)",
                metrics.hybrid_carbon_kg,
                metrics.truck_only_carbon_kg,
                metrics.carbon_saved_kg,
                metrics.carbon_reduction_pct
            )?;
        }

        if let Some(prediction) = &trip.prediction {
            let drone = prediction.drone_id.as_deref().unwrap_or("-");
            let minutes = prediction.usable_trip_minutes().unwrap_or(prediction.minutes);
            writeln!(
                out,
                "\nPredicted drone leg: {} (suggested drone {})",
                format_minutes(minutes),
                drone
            )?;
        }
        if let Some(wind) = trip.wind_speed_mps {
            writeln!(out, "Wind on drone leg: {:.1} m/s", wind)?;
        }
        Ok(())
    }
}

pub fn render_trip(trip: &PlannedTrip) -> String {
    TripReport(trip).to_string()
}

/// Report for a request where no delivery can go by drone.
pub struct NoPlanReport<'a>(pub &'a [Delivery]);

impl fmt::Display for NoPlanReport<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "No feasible drone delivery found. All deliveries assigned to truck.")?;
        for (index, delivery) in self.0.iter().enumerate() {
            writeln!(
                out,
                "  {}. {:.2} kg to ({:.5}, {:.5})",
                index + 1,
                delivery.weight_kg,
                delivery.location.lat,
                delivery.location.lon
            )?;
        }
        Ok(())
    }
}

pub fn render_no_plan(deliveries: &[Delivery]) -> String {
    NoPlanReport(deliveries).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_core::{
        optimize_assignment, plan_layout, Coordinate, Drone, DronePrediction, FleetSnapshot,
        TraversalKind,
    };

    /// Accepts `room` bytes, then fails every write.
    struct FullBuffer {
        room: usize,
    }

    impl fmt::Write for FullBuffer {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if s.len() > self.room {
                return Err(fmt::Error);
            }
            self.room -= s.len();
            Ok(())
        }
    }

    fn planned_trip(prediction: Option<DronePrediction>) -> PlannedTrip {
        let fleet = FleetSnapshot::new(vec![Drone {
            drone_id: "D1".to_string(),
            payload_capacity_kg: 5.0,
            battery_pct: 90.0,
            available: true,
        }]);
        let deliveries = vec![
            Delivery::new(1.0, Coordinate::new(0.0, 0.01)).unwrap(),
            Delivery::new(2.0, Coordinate::new(0.0, 0.3)).unwrap(),
        ];
        let plan = optimize_assignment(&deliveries, &fleet, Coordinate::new(0.0, 0.0)).unwrap();
        let layout = plan_layout(&plan, None, prediction.as_ref());
        PlannedTrip {
            plan,
            layout,
            prediction,
            wind_speed_mps: Some(3.4),
        }
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(0.0), "0 sec");
        assert_eq!(format_minutes(0.5), "30 sec");
        assert_eq!(format_minutes(50.0), "50 min 0 sec");
        assert_eq!(format_minutes(61.5), "1 hr 1 min 30 sec");
        assert_eq!(format_minutes(120.0), "2 hr 0 min 0 sec");
    }

    #[test]
    fn bad_minutes_are_not_available() {
        assert_eq!(format_minutes(-1.0), "N/A");
        assert_eq!(format_minutes(f64::NAN), "N/A");
        assert_eq!(format_minutes(f64::INFINITY), "N/A");
    }

    #[test]
    fn signed_minutes_keep_sign() {
        assert_eq!(format_signed_minutes(-2.5), "-2 min 30 sec");
        assert_eq!(format_signed_minutes(2.5), "2 min 30 sec");
    }

    #[test]
    fn step_lines_use_letters() {
        let point = TraversalPoint {
            kind: TraversalKind::Launch,
            location: Coordinate::new(1.0, 2.0),
            label: 2,
        };
        assert!(step(&point).contains("C. Launch Site"));
    }

    #[test]
    fn no_plan_lists_every_delivery() {
        let deliveries = vec![
            Delivery::new(1.0, Coordinate::new(0.0, 0.1)).unwrap(),
            Delivery::new(2.0, Coordinate::new(0.0, 0.2)).unwrap(),
        ];
        let text = render_no_plan(&deliveries);
        assert!(text.starts_with("No feasible drone delivery found."));
        assert!(text.contains("  2. 2.00 kg"));
    }

    #[test]
    fn trip_report_shows_whole_predicted_leg() {
        let trip = planned_trip(Some(DronePrediction {
            minutes: 21.0,
            trip_minutes: Some(42.0),
            drone_id: Some("D1".to_string()),
        }));
        let text = render_trip(&trip);
        assert!(text.starts_with("Hybrid trip plan ("));
        assert!(text.contains("Predicted drone leg: 42 min 0 sec (suggested drone D1)"));
        assert!(text.contains("Wind on drone leg: 3.4 m/s"));
    }

    #[test]
    fn report_write_errors_reach_caller() {
        use std::fmt::Write as _;

        let trip = planned_trip(None);
        let full = render_trip(&trip);
        let mut short = FullBuffer { room: full.len() / 2 };
        assert_eq!(write!(short, "{}", TripReport(&trip)), Err(fmt::Error));

        let deliveries = vec![Delivery::new(1.0, Coordinate::new(0.0, 0.1)).unwrap()];
        let mut none = FullBuffer { room: 0 };
        assert_eq!(write!(none, "{}", NoPlanReport(&deliveries)), Err(fmt::Error));

        let mut roomy = FullBuffer { room: full.len() };
        assert_eq!(write!(roomy, "{}", TripReport(&trip)), Ok(()));
    }
}
