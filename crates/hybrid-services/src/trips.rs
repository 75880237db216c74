//! Trip commit: record the trip with the trips API, append it to the local
//! trip log and retire the chosen drone.

use crate::client::{ensure_success, http_client, DEFAULT_TIMEOUT};
use crate::error::{ServiceError, ServiceResult};
use crate::fleet::FleetRegistry;
use chrono::{DateTime, Utc};
use hybrid_core::{Plan, TripLayout, TripMetrics};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SERVICE: &str = "trips";

/// A committed trip as stored in the log and sent to the trips API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedTrip {
    pub plan: Plan,
    /// Final figures; absent when the drone leg could not be placed
    #[serde(default)]
    pub metrics: Option<TripMetrics>,
    /// Drone suggested by the predictor, if it named one
    #[serde(default)]
    pub suggested_drone_id: Option<String>,
    pub committed_at: DateTime<Utc>,
}

impl CommittedTrip {
    pub fn new(plan: Plan, layout: &TripLayout, suggested_drone_id: Option<String>) -> Self {
        Self {
            plan,
            metrics: layout.metrics.clone(),
            suggested_drone_id,
            committed_at: Utc::now(),
        }
    }
}

/// Append-only list of committed trips in a JSON file.
pub struct TripLog {
    path: PathBuf,
}

impl TripLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All trips, oldest first. A missing file is an empty log.
    pub async fn load(&self) -> ServiceResult<Vec<CommittedTrip>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ServiceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| ServiceError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Trip at `index` (0 is the oldest).
    pub async fn get(&self, index: usize) -> ServiceResult<CommittedTrip> {
        self.load()
            .await?
            .into_iter()
            .nth(index)
            .ok_or(ServiceError::MissingTrip(index))
    }

    /// Most recent trip.
    pub async fn latest(&self) -> ServiceResult<CommittedTrip> {
        let trips = self.load().await?;
        let index = trips.len().checked_sub(1).ok_or(ServiceError::MissingTrip(0))?;
        trips
            .into_iter()
            .nth(index)
            .ok_or(ServiceError::MissingTrip(index))
    }

    /// Append `trip` and return its index.
    pub async fn append(&self, trip: CommittedTrip) -> ServiceResult<usize> {
        let mut trips = self.load().await?;
        trips.push(trip);
        let body = serde_json::to_string_pretty(&trips).map_err(|source| ServiceError::Json {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| ServiceError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(trips.len() - 1)
    }
}

pub struct TripCommitter {
    pub(crate) client: Client,
    /// Trips API endpoint; `None` records locally only
    pub(crate) trips_url: Option<String>,
}

impl TripCommitter {
    pub fn new(trips_url: Option<String>) -> Self {
        Self {
            client: http_client(DEFAULT_TIMEOUT),
            trips_url,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Commit `trip`.
    ///
    /// The remote record is written first; if it fails nothing else changes.
    /// Then the drone is marked unavailable and the fleet persisted, and only
    /// after that is the trip appended to `log`. A failed local step puts the
    /// drone back so the commit can be retried without a duplicate log entry.
    pub async fn commit(
        &self,
        trip: CommittedTrip,
        log: &TripLog,
        fleet: &FleetRegistry,
    ) -> ServiceResult<usize> {
        let drone_id = trip.plan.drone.drone_id.clone();

        if let Some(url) = &self.trips_url {
            let response = self
                .client
                .post(url)
                .json(&trip)
                .send()
                .await
                .map_err(ServiceError::http(SERVICE))?;
            ensure_success(SERVICE, response)?;
            tracing::info!("Trip recorded with trips API");
        } else {
            tracing::debug!("no trips API configured; recording locally");
        }

        fleet.mark_unavailable(&drone_id)?;
        if let Err(err) = fleet.persist().await {
            fleet.set_available(&drone_id, true)?;
            return Err(err);
        }

        let index = match log.append(trip).await {
            Ok(index) => index,
            Err(err) => {
                fleet.set_available(&drone_id, true)?;
                if let Err(restore) = fleet.persist().await {
                    tracing::warn!("Failed to restore drone {} in fleet file: {}", drone_id, restore);
                }
                return Err(err);
            }
        };
        tracing::info!("Committed trip {} with drone {}", index + 1, drone_id);
        Ok(index)
    }
}
