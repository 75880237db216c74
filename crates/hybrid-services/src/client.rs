//! Shared HTTP plumbing for the collaborator clients.

use crate::error::{ServiceError, ServiceResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a client with a request timeout.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send a prepared request and decode a JSON body, mapping every failure to
/// a [`ServiceError`] tagged with `service`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> ServiceResult<T> {
    let response = request.send().await.map_err(ServiceError::http(service))?;
    let response = ensure_success(service, response)?;
    response.json::<T>().await.map_err(ServiceError::http(service))
}

pub(crate) fn ensure_success(service: &'static str, response: Response) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::Status { service, status })
    }
}
