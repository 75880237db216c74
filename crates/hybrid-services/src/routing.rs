//! Road-following truck route from the Mapbox Directions API.

use crate::client::{fetch_json, http_client, DEFAULT_TIMEOUT};
use crate::error::{ServiceError, ServiceResult};
use hybrid_core::Coordinate;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "directions";

pub const DEFAULT_DIRECTIONS_URL: &str = "https://api.mapbox.com/directions/v5/mapbox/driving";

/// HTTP client for a driving-directions provider.
pub struct DirectionsClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) access_token: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: RouteGeometry,
}

/// GeoJSON line string; positions are `[lon, lat]`.
#[derive(Debug, Deserialize)]
struct RouteGeometry {
    coordinates: Vec<[f64; 2]>,
}

impl DirectionsClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: http_client(DEFAULT_TIMEOUT),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Fetch a drivable polyline through `waypoints` in order.
    pub async fn road_polyline(&self, waypoints: &[Coordinate]) -> ServiceResult<Vec<Coordinate>> {
        if waypoints.len() < 2 {
            return Err(ServiceError::malformed(SERVICE, "need at least 2 waypoints"));
        }
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            waypoint_path(waypoints)
        );
        let request = self.client.get(&url).query(&[
            ("geometries", "geojson"),
            ("access_token", self.access_token.as_str()),
        ]);
        let response: DirectionsResponse = fetch_json(SERVICE, request).await?;
        polyline_from(response)
    }
}

/// `lon,lat;lon,lat;...` as the directions path segment expects.
fn waypoint_path(waypoints: &[Coordinate]) -> String {
    waypoints
        .iter()
        .map(|c| format!("{},{}", c.lon, c.lat))
        .collect::<Vec<_>>()
        .join(";")
}

fn polyline_from(response: DirectionsResponse) -> ServiceResult<Vec<Coordinate>> {
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::malformed(SERVICE, "no route found"))?;
    let polyline: Vec<Coordinate> = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lon, lat]| Coordinate::new(lat, lon))
        .collect();
    if polyline.len() < 2 {
        return Err(ServiceError::malformed(SERVICE, "route geometry too short"));
    }
    Ok(polyline)
}

/// Road polyline for `route`, or `None` to fall back to straight lines.
///
/// Failures are logged and never propagated.
pub async fn road_polyline_or_fallback(
    client: Option<&DirectionsClient>,
    route: &[Coordinate],
) -> Option<Vec<Coordinate>> {
    let client = client?;
    if route.len() < 2 {
        return None;
    }
    match client.road_polyline(route).await {
        Ok(polyline) => {
            tracing::debug!("road polyline with {} points", polyline.len());
            Some(polyline)
        }
        Err(err) => {
            tracing::warn!("Failed to fetch truck route, using straight lines: {}", err);
            None
        }
    }
}
