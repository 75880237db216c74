//! One planning run: optimize, then lay the plan out with whatever
//! collaborators are reachable.

use crate::config::Config;
use hybrid_core::{
    optimize_assignment, plan_layout, sequence_truck_route, Coordinate, Delivery,
    DronePrediction, FleetSnapshot, Plan, TripLayout,
};
use hybrid_services::{
    http_client, prediction_or_none, road_polyline_or_fallback, wind_or_none, DirectionsClient,
    PredictorClient, WeatherClient,
};

/// Optional remote lookups. A `None` client means the lookup is skipped.
#[derive(Default)]
pub struct Collaborators {
    pub directions: Option<DirectionsClient>,
    pub weather: Option<WeatherClient>,
    pub predictor: Option<PredictorClient>,
}

impl Collaborators {
    /// No remote lookups at all.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let client = http_client(config.http_timeout);

        let directions = config.mapbox_token.as_ref().map(|token| {
            DirectionsClient::new(&config.directions_url, token).with_client(client.clone())
        });
        if directions.is_none() {
            tracing::info!("MAPBOX_TOKEN not set, using straight-line truck route");
        }
        let weather = config.openweather_api_key.as_ref().map(|key| {
            WeatherClient::new(&config.weather_url, key).with_client(client.clone())
        });
        let predictor = config
            .predictor_url
            .as_ref()
            .map(|url| PredictorClient::new(url).with_client(client.clone()));

        Self {
            directions,
            weather,
            predictor,
        }
    }
}

/// A finished plan with its layout and the collaborator results it used.
#[derive(Debug, Clone)]
pub struct PlannedTrip {
    pub plan: Plan,
    pub layout: TripLayout,
    pub prediction: Option<DronePrediction>,
    /// Wind at the middle of the drone leg, m/s
    pub wind_speed_mps: Option<f64>,
}

/// Run the optimizer and, when a plan exists, lay it out.
///
/// Returns `None` when no delivery can go by drone. Collaborator failures
/// only remove the corresponding enrichment.
pub async fn plan_trip(
    deliveries: &[Delivery],
    fleet: &FleetSnapshot,
    depot: Coordinate,
    collaborators: &Collaborators,
) -> Option<PlannedTrip> {
    let plan = optimize_assignment(deliveries, fleet, depot)?;
    tracing::info!(
        "Drone {} takes delivery at ({:.4}, {:.4}); {} stops by truck",
        plan.drone.drone_id,
        plan.drone_delivery.location.lat,
        plan.drone_delivery.location.lon,
        plan.truck_deliveries.len()
    );

    let route = sequence_truck_route(plan.depot, &plan.truck_deliveries);
    let (road, prediction) = tokio::join!(
        road_polyline_or_fallback(collaborators.directions.as_ref(), &route),
        prediction_or_none(collaborators.predictor.as_ref(), &plan),
    );

    let layout = plan_layout(&plan, road.as_deref(), prediction.as_ref());
    let wind_speed_mps = wind_or_none(
        collaborators.weather.as_ref(),
        layout.drone_leg_midpoint(&plan),
    )
    .await;

    Some(PlannedTrip {
        plan,
        layout,
        prediction,
        wind_speed_mps,
    })
}
