//! Hybrid Services - external collaborators for trip planning
//!
//! Road directions, wind, drone-time prediction, the fleet registry and the
//! trip commit path. Every remote lookup has a `*_or_*` helper that logs the
//! failure and returns the local fallback instead.

pub mod client;
pub mod error;
pub mod fleet;
pub mod predictor;
pub mod routing;
pub mod trips;
pub mod weather;

pub use client::{http_client, DEFAULT_TIMEOUT};
pub use error::{ServiceError, ServiceResult};
pub use fleet::FleetRegistry;
pub use predictor::{prediction_or_none, PredictionRequest, PredictorClient};
pub use routing::{road_polyline_or_fallback, DirectionsClient, DEFAULT_DIRECTIONS_URL};
pub use trips::{CommittedTrip, TripCommitter, TripLog};
pub use weather::{wind_or_none, WeatherClient, DEFAULT_WEATHER_URL};
