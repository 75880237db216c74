//! Trip request files.

use anyhow::{Context, Result};
use hybrid_core::{Coordinate, Delivery, DeliveryForm, Drone, InputError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A planning request as read from disk.
///
/// ```json
/// {
///   "depot": {"lat": 12.9716, "lng": 77.5946},
///   "deliveries": [{"weight": "2", "latitude": "12.98", "longitude": "77.60"}],
///   "drones": [{"droneId": "D1", "payload": 5, "currentBattery": 90, "available": true}]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripRequest {
    #[serde(default)]
    pub depot: Option<Coordinate>,
    pub deliveries: Vec<DeliveryForm>,
    /// Inline fleet; replaces the fleet file when present
    #[serde(default)]
    pub drones: Option<Vec<Drone>>,
}

impl TripRequest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid request JSON in {}", path.display()))
    }

    pub fn from_deliveries(deliveries: &[Delivery], depot: Coordinate) -> Self {
        Self {
            depot: Some(depot),
            deliveries: deliveries.iter().map(DeliveryForm::from).collect(),
            drones: None,
        }
    }

    /// Validated deliveries in request order.
    pub fn deliveries(&self) -> Result<Vec<Delivery>, InputError> {
        DeliveryForm::parse_all(&self.deliveries)
    }

    pub fn depot_or(&self, default: Coordinate) -> Result<Coordinate> {
        let depot = self.depot.unwrap_or(default);
        anyhow::ensure!(
            depot.is_finite() && depot.lat.abs() <= 90.0 && depot.lon.abs() <= 180.0,
            "depot ({}, {}) is not a valid coordinate",
            depot.lat,
            depot.lon
        );
        Ok(depot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_rows_and_inline_fleet() {
        let request: TripRequest = serde_json::from_value(serde_json::json!({
            "depot": {"latitude": 0.0, "longitude": 0.0},
            "deliveries": [
                {"weight": "1.5", "latitude": "0.01", "longitude": "0.02"},
                {"weight": 3, "latitude": 0.2, "lng": 0.1}
            ],
            "drones": [{"droneId": "D1", "payload": 5, "currentBattery": 90, "available": true}]
        }))
        .unwrap();

        let deliveries = request.deliveries().unwrap();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].weight_kg, 1.5);
        assert_eq!(deliveries[1].location, Coordinate::new(0.2, 0.1));
        assert_eq!(request.drones.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            request.depot_or(Coordinate::new(9.0, 9.0)).unwrap(),
            Coordinate::new(0.0, 0.0)
        );
    }

    #[test]
    fn empty_weight_reports_row() {
        let request: TripRequest = serde_json::from_value(serde_json::json!({
            "deliveries": [
                {"weight": "1", "latitude": "1", "longitude": "1"},
                {"weight": "", "latitude": "1", "longitude": "1"}
            ]
        }))
        .unwrap();
        let err = request.deliveries().unwrap_err();
        assert!(err.to_string().starts_with("delivery 2:"), "{err}");
    }

    #[test]
    fn missing_depot_uses_default() {
        let request = TripRequest::default();
        let fallback = Coordinate::new(12.9716, 77.5946);
        assert_eq!(request.depot_or(fallback).unwrap(), fallback);
    }

    #[test]
    fn out_of_range_depot_is_rejected() {
        let request = TripRequest {
            depot: Some(Coordinate::new(95.0, 0.0)),
            ..TripRequest::default()
        };
        assert!(request.depot_or(Coordinate::new(0.0, 0.0)).is_err());
    }
}
