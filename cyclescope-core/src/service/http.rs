//! Blocking HTTP client for the computation service.

use std::time::Duration;

use crate::domain::IndicatorDescriptor;

use super::api::{ComputeRequest, ComputeResponse, ComputeResult, ComputeService, ServiceError};

/// HTTP implementation of [`ComputeService`].
///
/// Endpoints:
/// - `GET  {base}/indicators` → `Vec<IndicatorDescriptor>`
/// - `POST {base}/compute`    → [`ComputeResponse`]
pub struct HttpComputeService {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpComputeService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl ComputeService for HttpComputeService {
    fn descriptors(&self) -> Result<Vec<IndicatorDescriptor>, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("indicators"))
            .send()
            .map_err(transport_error)?;
        response
            .json::<Vec<IndicatorDescriptor>>()
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))
    }

    fn compute(&self, request: &ComputeRequest) -> Result<ComputeResult, ServiceError> {
        let response = self
            .client
            .post(self.endpoint("compute"))
            .json(request)
            .send()
            .map_err(transport_error)?;
        let envelope: ComputeResponse = response
            .json()
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;
        envelope.into_result()
    }
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    ServiceError::Unreachable(e.to_string())
}
