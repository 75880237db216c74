//! Drone fleet registry backed by a JSON file.

use crate::error::{ServiceError, ServiceResult};
use dashmap::DashMap;
use hybrid_core::{Drone, FleetSnapshot};
use std::path::{Path, PathBuf};

/// Thread-safe fleet store. Listing order is the order drones were loaded.
///
/// A registry loaded from a file remembers it and [`FleetRegistry::persist`]
/// writes back there; one built in memory has nowhere to persist to.
#[derive(Default)]
pub struct FleetRegistry {
    drones: DashMap<String, (usize, Drone)>,
    backing: Option<PathBuf>,
}

impl FleetRegistry {
    /// Build a registry from `drones`. Drone ids must be unique.
    pub fn from_drones(drones: Vec<Drone>) -> ServiceResult<Self> {
        let registry = Self::default();
        for (position, drone) in drones.into_iter().enumerate() {
            let id = drone.drone_id.clone();
            if registry.drones.contains_key(&id) {
                return Err(ServiceError::DuplicateDrone(id));
            }
            registry.drones.insert(id, (position, drone));
        }
        Ok(registry)
    }

    pub fn backed_by(mut self, path: impl Into<PathBuf>) -> Self {
        self.backing = Some(path.into());
        self
    }

    pub fn backing_path(&self) -> Option<&Path> {
        self.backing.as_deref()
    }

    /// Read a JSON array of drones. A missing file is an empty fleet.
    pub async fn load(path: &Path) -> ServiceResult<Self> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Fleet file {} not found, starting empty", path.display());
                return Ok(Self::default().backed_by(path));
            }
            Err(source) => {
                return Err(ServiceError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let drones: Vec<Drone> = serde_json::from_str(&raw).map_err(|source| ServiceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded {} drones from {}", drones.len(), path.display());
        Ok(Self::from_drones(drones)?.backed_by(path))
    }

    pub async fn save(&self, path: &Path) -> ServiceResult<()> {
        let body = serde_json::to_string_pretty(&self.snapshot()).map_err(|source| {
            ServiceError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tokio::fs::write(path, body)
            .await
            .map_err(|source| ServiceError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write the fleet back to the file it was loaded from, if any.
    pub async fn persist(&self) -> ServiceResult<()> {
        match &self.backing {
            Some(path) => self.save(path).await,
            None => {
                tracing::debug!("in-memory fleet; nothing to persist");
                Ok(())
            }
        }
    }

    /// Owned copy of the fleet for one planning run.
    pub fn snapshot(&self) -> FleetSnapshot {
        let mut entries: Vec<(usize, Drone)> =
            self.drones.iter().map(|r| r.value().clone()).collect();
        entries.sort_by_key(|(position, _)| *position);
        FleetSnapshot::new(entries.into_iter().map(|(_, drone)| drone).collect())
    }

    pub fn set_available(&self, drone_id: &str, available: bool) -> ServiceResult<()> {
        let mut entry = self
            .drones
            .get_mut(drone_id)
            .ok_or_else(|| ServiceError::UnknownDrone(drone_id.to_string()))?;
        entry.1.available = available;
        Ok(())
    }

    pub fn mark_unavailable(&self, drone_id: &str) -> ServiceResult<()> {
        self.set_available(drone_id, false)?;
        tracing::info!("Drone {} marked unavailable", drone_id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }
}
