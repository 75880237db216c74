//! Planner configuration from environment.

use hybrid_core::{Coordinate, DEFAULT_DEPOT};
use hybrid_services::{DEFAULT_DIRECTIONS_URL, DEFAULT_WEATHER_URL};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directions access token; routing is skipped without one
    pub mapbox_token: Option<String>,
    /// Weather API key; the wind lookup is skipped without one
    pub openweather_api_key: Option<String>,
    pub directions_url: String,
    pub weather_url: String,
    pub predictor_url: Option<String>,
    pub trips_api_url: Option<String>,
    pub fleet_file: PathBuf,
    pub trip_log_file: PathBuf,
    pub depot: Coordinate,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let default_depot = DEFAULT_DEPOT;
        let depot = Coordinate::new(
            non_empty("DEPOT_LAT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default_depot.lat),
            non_empty("DEPOT_LON")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default_depot.lon),
        );

        Self {
            mapbox_token: non_empty("MAPBOX_TOKEN"),
            openweather_api_key: non_empty("OPENWEATHER_API_KEY"),
            directions_url: non_empty("DIRECTIONS_URL")
                .unwrap_or_else(|| DEFAULT_DIRECTIONS_URL.to_string()),
            weather_url: non_empty("WEATHER_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            predictor_url: non_empty("PREDICTOR_URL"),
            trips_api_url: non_empty("TRIPS_API_URL"),
            fleet_file: non_empty("FLEET_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("fleet.json")),
            trip_log_file: non_empty("TRIP_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("trips.json")),
            depot,
            http_timeout: Duration::from_secs(
                non_empty("HTTP_TIMEOUT_SECS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert!(config.mapbox_token.is_none());
        assert!(config.predictor_url.is_none());
        assert_eq!(config.directions_url, DEFAULT_DIRECTIONS_URL);
        assert_eq!(config.depot, DEFAULT_DEPOT);
        assert_eq!(config.fleet_file, PathBuf::from("fleet.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn blank_token_disables_routing() {
        assert!(config(&[("MAPBOX_TOKEN", "  ")]).mapbox_token.is_none());
    }

    #[test]
    fn depot_override_and_bad_values() {
        let config = config(&[
            ("DEPOT_LAT", "40.7"),
            ("DEPOT_LON", "east"),
            ("HTTP_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.depot, Coordinate::new(40.7, DEFAULT_DEPOT.lon));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }
}
