//! Failures of external collaborators. Every one of them has a fallback in
//! the caller, so none of these abort planning.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{service} response unusable: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },

    #[error("unknown drone {0}")]
    UnknownDrone(String),

    #[error("drone {0} is listed more than once")]
    DuplicateDrone(String),

    #[error("trip log has no entry {0}")]
    MissingTrip(usize),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> ServiceError {
        move |source| ServiceError::Http { service, source }
    }

    pub(crate) fn malformed(service: &'static str, reason: impl Into<String>) -> ServiceError {
        ServiceError::Malformed {
            service,
            reason: reason.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
