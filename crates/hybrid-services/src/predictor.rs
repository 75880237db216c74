//! Drone-leg duration predictor.
//!
//! The predictor only replaces the geometric drone time; eligibility and
//! assignment always use the geometric model.

use crate::client::{fetch_json, http_client, DEFAULT_TIMEOUT};
use crate::error::ServiceResult;
use hybrid_core::{distance, Coordinate, DistanceUnit, DronePrediction, Plan};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "predictor";

pub struct PredictorClient {
    pub(crate) client: Client,
    pub(crate) url: String,
}

/// Features sent to the predictor for the chosen drone delivery.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    pub drone_id: String,
    pub payload_kg: f64,
    pub battery_pct: f64,
    pub depot: Coordinate,
    pub destination: Coordinate,
    pub distance_km: f64,
}

impl PredictionRequest {
    pub fn for_plan(plan: &Plan) -> Self {
        let destination = plan.drone_delivery.location;
        Self {
            drone_id: plan.drone.drone_id.clone(),
            payload_kg: plan.drone_delivery.weight_kg,
            battery_pct: plan.drone.battery_pct,
            depot: plan.depot,
            destination,
            distance_km: distance(plan.depot, destination, DistanceUnit::Kilometers),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    predicted_time_minutes: Option<f64>,
    #[serde(default)]
    time: Option<f64>,
    #[serde(default, alias = "droneId")]
    drone_id: Option<String>,
    #[serde(default)]
    drone: Option<PredictedDrone>,
}

#[derive(Debug, Deserialize)]
struct PredictedDrone {
    drone_id: Option<String>,
}

impl PredictorClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: http_client(DEFAULT_TIMEOUT),
            url: url.into(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Ask for a drone-leg duration. `Ok(None)` means the predictor answered
    /// without a usable time.
    pub async fn predict(&self, plan: &Plan) -> ServiceResult<Option<DronePrediction>> {
        let request = PredictionRequest::for_plan(plan);
        let payload: PredictionResponse =
            fetch_json(SERVICE, self.client.post(&self.url).json(&request)).await?;
        Ok(prediction_from(payload))
    }
}

fn prediction_from(payload: PredictionResponse) -> Option<DronePrediction> {
    // Only `predicted_time_minutes` is a full-trip figure; `time` only
    // times the drone segments.
    let trip_minutes = payload.predicted_time_minutes;
    let minutes = trip_minutes.or(payload.time)?;
    let drone_id = payload
        .drone_id
        .or_else(|| payload.drone.and_then(|drone| drone.drone_id));
    let prediction = DronePrediction {
        minutes,
        trip_minutes,
        drone_id,
    };
    prediction.usable_minutes().map(|_| prediction)
}

/// Prediction for `plan`, or `None` to keep the geometric estimate.
pub async fn prediction_or_none(
    client: Option<&PredictorClient>,
    plan: &Plan,
) -> Option<DronePrediction> {
    let client = client?;
    match client.predict(plan).await {
        Ok(Some(prediction)) => {
            tracing::info!("Predicted drone leg: {:.1} min", prediction.minutes);
            Some(prediction)
        }
        Ok(None) => {
            tracing::debug!("predictor returned no usable time");
            None
        }
        Err(err) => {
            tracing::warn!("Drone time prediction failed, using geometric estimate: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> Option<DronePrediction> {
        prediction_from(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn accepts_either_minutes_field() {
        let a = parse(serde_json::json!({"predicted_time_minutes": 12.5, "drone_id": "D2"})).unwrap();
        assert_eq!(a.minutes, 12.5);
        assert_eq!(a.usable_trip_minutes(), Some(12.5));
        assert_eq!(a.drone_id.as_deref(), Some("D2"));

        let b = parse(serde_json::json!({"time": 8.0, "drone": {"drone_id": "D4"}})).unwrap();
        assert_eq!(b.minutes, 8.0);
        assert_eq!(b.drone_id.as_deref(), Some("D4"));
        // `time` alone never replaces the whole drone-leg time.
        assert_eq!(b.usable_trip_minutes(), None);
    }

    #[test]
    fn preferred_field_wins() {
        let p = parse(serde_json::json!({"predicted_time_minutes": 5.0, "time": 9.0})).unwrap();
        assert_eq!(p.minutes, 5.0);
    }

    #[test]
    fn unusable_minutes_are_dropped() {
        assert!(parse(serde_json::json!({"predicted_time_minutes": 0.0})).is_none());
        assert!(parse(serde_json::json!({"drone_id": "D1"})).is_none());
    }
}
