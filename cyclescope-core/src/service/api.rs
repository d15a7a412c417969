//! Wire types and the service trait.
//!
//! The `ComputeService` trait abstracts over the external computation
//! service so the worker can run against the real HTTP endpoint or a
//! synthetic offline implementation, and tests can use mocks.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{IndicatorDescriptor, ParameterOverrides, ScorePoint};

/// Request payload sent to the computation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    pub indicators: Vec<String>,
    #[serde(default, skip_serializing_if = "ParameterOverrides::is_empty")]
    pub indicator_params: ParameterOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub roc_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdca_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdca_out: Option<f64>,
    pub force_refresh: bool,
}

/// Success envelope returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<ScorePoint>,
    #[serde(default)]
    pub roc: HashMap<String, f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Unwrapped computation result: the score series plus per-indicator ROC
/// deltas over the requested window.
#[derive(Debug, Clone)]
pub struct ComputeResult {
    pub data: Vec<ScorePoint>,
    pub roc: HashMap<String, f64>,
}

/// Structured errors from the service boundary.
///
/// `Rejected` carries the service's own human-readable message and is
/// surfaced to the user unmodified.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Rejected(String),
}

/// Abstraction over the external computation service.
pub trait ComputeService: Send {
    /// Fetch the indicator descriptor set (once per session).
    fn descriptors(&self) -> Result<Vec<IndicatorDescriptor>, ServiceError>;

    /// Compute the score series and ROC deltas for one request.
    fn compute(&self, request: &ComputeRequest) -> Result<ComputeResult, ServiceError>;
}

impl ComputeResponse {
    /// Unwrap the success envelope into a result or a rejection message.
    pub fn into_result(self) -> Result<ComputeResult, ServiceError> {
        if self.success {
            Ok(ComputeResult {
                data: self.data,
                roc: self.roc,
            })
        } else {
            Err(ServiceError::Rejected(
                self.error
                    .unwrap_or_else(|| "computation failed".to_string()),
            ))
        }
    }
}
