//! Wind lookup for the drone leg. Display only; never feeds time or carbon math.

use crate::client::{fetch_json, http_client, DEFAULT_TIMEOUT};
use crate::error::ServiceResult;
use hybrid_core::Coordinate;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "weather";

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct WeatherClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    wind: Option<WeatherWind>,
}

#[derive(Debug, Deserialize)]
struct WeatherWind {
    speed: Option<f64>,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: http_client(DEFAULT_TIMEOUT),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Current wind speed in m/s at `at`, if the provider reports one.
    pub async fn wind_speed(&self, at: Coordinate) -> ServiceResult<Option<f64>> {
        let request = self.client.get(&self.base_url).query(&[
            ("lat", at.lat.to_string()),
            ("lon", at.lon.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]);
        let payload: WeatherResponse = fetch_json(SERVICE, request).await?;
        Ok(wind_from(payload))
    }
}

fn wind_from(payload: WeatherResponse) -> Option<f64> {
    payload
        .wind
        .and_then(|wind| wind.speed)
        .filter(|speed| speed.is_finite() && *speed >= 0.0)
}

/// Wind at `at`, or `None` when the lookup is disabled or fails.
pub async fn wind_or_none(client: Option<&WeatherClient>, at: Option<Coordinate>) -> Option<f64> {
    let (client, at) = (client?, at?);
    match client.wind_speed(at).await {
        Ok(speed) => speed,
        Err(err) => {
            tracing::warn!("Failed to fetch wind speed: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> Option<f64> {
        wind_from(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn reads_wind_speed() {
        let speed = parse(serde_json::json!({
            "weather": [{"main": "Clouds"}],
            "wind": {"speed": 4.6, "deg": 250}
        }));
        assert_eq!(speed, Some(4.6));
    }

    #[test]
    fn missing_wind_is_none() {
        assert_eq!(parse(serde_json::json!({"main": {"temp": 24.0}})), None);
        assert_eq!(parse(serde_json::json!({"wind": {"deg": 90}})), None);
    }

    #[tokio::test]
    async fn disabled_lookup_is_none() {
        assert_eq!(wind_or_none(None, Some(Coordinate::new(1.0, 1.0))).await, None);
    }
}
