//! Computation-service boundary: wire types, the client trait, and the
//! HTTP implementation.

pub mod api;
pub mod http;

pub use api::{ComputeRequest, ComputeResponse, ComputeResult, ComputeService, ServiceError};
pub use http::HttpComputeService;
