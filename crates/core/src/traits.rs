//! HttpTransport trait definition
//!
//! The orchestrator only needs "send this request, give me the response".
//! Keeping that behind a trait lets the core stay independent of any HTTP
//! client library and lets tests run without a network.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::InternalRequest;
use crate::response::BceHttpResponse;

/// Sends a signed request and returns the raw response
///
/// Implementations report I/O failures as [`crate::Error::Network`]; they never
/// classify HTTP statuses, that is the handler chain's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request
    async fn send(&self, request: &InternalRequest) -> Result<BceHttpResponse>;
}
