//! Core data models for hybrid truck/drone trip planning.

use crate::error::InputError;
use crate::spatial::{Coordinate, DistanceUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parcel to deliver. Identity is its position in the request list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(alias = "weight")]
    pub weight_kg: f64,
    #[serde(flatten)]
    pub location: Coordinate,
}

impl Delivery {
    /// Build a delivery from already-numeric values, rejecting anything the
    /// planner cannot work with.
    pub fn new(weight_kg: f64, location: Coordinate) -> Result<Self, InputError> {
        if !weight_kg.is_finite() || weight_kg < 0.0 {
            return Err(InputError::OutOfRange {
                field: "weight",
                value: weight_kg,
            });
        }
        if !location.lat.is_finite() || !(-90.0..=90.0).contains(&location.lat) {
            return Err(InputError::OutOfRange {
                field: "latitude",
                value: location.lat,
            });
        }
        if !location.lon.is_finite() || !(-180.0..=180.0).contains(&location.lon) {
            return Err(InputError::OutOfRange {
                field: "longitude",
                value: location.lon,
            });
        }
        Ok(Self {
            weight_kg,
            location,
        })
    }

    /// Re-check a delivery that arrived through deserialization.
    pub fn validate(&self) -> Result<(), InputError> {
        Delivery::new(self.weight_kg, self.location).map(|_| ())
    }
}

/// A raw form field: either typed text or an already-numeric JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormField {
    Number(f64),
    Text(String),
}

impl Default for FormField {
    fn default() -> Self {
        FormField::Text(String::new())
    }
}

impl FormField {
    fn parse(&self, field: &'static str) -> Result<f64, InputError> {
        match self {
            FormField::Number(value) => Ok(*value),
            FormField::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(InputError::Missing { field });
                }
                trimmed.parse::<f64>().map_err(|_| InputError::NotNumeric {
                    field,
                    value: trimmed.to_string(),
                })
            }
        }
    }
}

/// One row of the delivery entry form before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryForm {
    #[serde(default)]
    pub weight: FormField,
    #[serde(default)]
    pub latitude: FormField,
    #[serde(default, alias = "lng")]
    pub longitude: FormField,
}

impl DeliveryForm {
    /// Parse this row into a validated delivery. `index` is the row position
    /// and is attached to any error.
    pub fn parse(&self, index: usize) -> Result<Delivery, InputError> {
        self.parse_fields().map_err(|err| err.at(index))
    }

    fn parse_fields(&self) -> Result<Delivery, InputError> {
        let weight = self.weight.parse("weight")?;
        let lat = self.latitude.parse("latitude")?;
        let lon = self.longitude.parse("longitude")?;
        Delivery::new(weight, Coordinate::new(lat, lon))
    }

    /// Parse every row, failing on the first invalid one.
    pub fn parse_all(rows: &[DeliveryForm]) -> Result<Vec<Delivery>, InputError> {
        if rows.is_empty() {
            return Err(InputError::NoDeliveries);
        }
        rows.iter()
            .enumerate()
            .map(|(index, row)| row.parse(index))
            .collect()
    }
}

impl From<&Delivery> for DeliveryForm {
    fn from(delivery: &Delivery) -> Self {
        Self {
            weight: FormField::Number(delivery.weight_kg),
            latitude: FormField::Number(delivery.location.lat),
            longitude: FormField::Number(delivery.location.lon),
        }
    }
}

/// A drone as listed by the fleet registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    #[serde(alias = "droneId")]
    pub drone_id: String,
    /// Maximum payload in kg
    #[serde(alias = "payload")]
    pub payload_capacity_kg: f64,
    /// Current charge, 0-100
    #[serde(alias = "currentBattery")]
    pub battery_pct: f64,
    /// Absent in a fleet file means not dispatchable
    #[serde(default)]
    pub available: bool,
}

/// Read-only view of the fleet taken at planning time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FleetSnapshot {
    drones: Vec<Drone>,
}

impl FleetSnapshot {
    pub fn new(drones: Vec<Drone>) -> Self {
        Self { drones }
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn get(&self, drone_id: &str) -> Option<&Drone> {
        self.drones.iter().find(|drone| drone.drone_id == drone_id)
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }
}

/// Result of one assignment run: one delivery by drone, the rest by truck.
///
/// Distances, carbon and minutes here are the trip-creation estimate and are
/// expressed in `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub depot: Coordinate,
    pub drone: Drone,
    pub drone_delivery: Delivery,
    /// Remaining deliveries in request order
    pub truck_deliveries: Vec<Delivery>,
    /// The full request as submitted
    pub deliveries: Vec<Delivery>,
    pub unit: DistanceUnit,
    pub drone_distance: f64,
    pub truck_distance: f64,
    pub truck_only_distance: f64,
    pub hybrid_carbon_kg: f64,
    pub truck_only_carbon_kg: f64,
    pub carbon_reduction_pct: f64,
    pub estimated_minutes: f64,
    pub truck_only_minutes: f64,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Decompose the plan back into a delivery list for editing: the drone
    /// delivery first, then the truck deliveries.
    pub fn deliveries_for_edit(&self) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(self.truck_deliveries.len() + 1);
        deliveries.push(self.drone_delivery);
        deliveries.extend(self.truck_deliveries.iter().copied());
        deliveries
    }

    pub fn into_deliveries(self) -> Vec<Delivery> {
        self.deliveries_for_edit()
    }
}

/// Externally predicted drone-leg duration.
///
/// `minutes` times each drone segment in the itinerary. `trip_minutes` is
/// only set when the predictor reported a full-trip figure and replaces the
/// geometric out-and-back time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DronePrediction {
    pub minutes: f64,
    #[serde(default)]
    pub trip_minutes: Option<f64>,
    #[serde(default)]
    pub drone_id: Option<String>,
}

fn usable(minutes: f64) -> Option<f64> {
    (minutes.is_finite() && minutes > 0.0).then_some(minutes)
}

impl DronePrediction {
    /// Minutes for one drone segment, if the prediction is usable.
    pub fn usable_minutes(&self) -> Option<f64> {
        usable(self.minutes)
    }

    /// Minutes for the whole drone leg, if the predictor reported one.
    pub fn usable_trip_minutes(&self) -> Option<f64> {
        self.trip_minutes.and_then(usable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalKind {
    Depot,
    TruckStop,
    Launch,
    DroneDelivery,
    Landing,
}

impl TraversalKind {
    pub fn display_name(self) -> &'static str {
        match self {
            TraversalKind::Depot => "Headquarters",
            TraversalKind::TruckStop => "Truck Delivery",
            TraversalKind::Launch => "Launch Site",
            TraversalKind::DroneDelivery => "Drone Delivery",
            TraversalKind::Landing => "Landing Site",
        }
    }
}

/// A labeled stop in the final traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraversalPoint {
    pub kind: TraversalKind,
    pub location: Coordinate,
    /// Position in traversal order, starting at 0
    pub label: usize,
}

impl TraversalPoint {
    /// Step letter for display: 0 -> "A". Past "Z" the numeric label is used.
    pub fn step_letter(&self) -> String {
        match u8::try_from(self.label) {
            Ok(offset) if offset < 26 => char::from(b'A' + offset).to_string(),
            _ => self.label.to_string(),
        }
    }
}
