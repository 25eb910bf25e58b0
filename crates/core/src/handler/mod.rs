//! Response handler chain
//!
//! A response is processed by an ordered list of handlers. Each handler may
//! read headers, consume the body, or fail the call. A handler returning
//! `Ok(true)` stops the chain.
//!
//! The default chain is:
//!
//! 1. [`MetadataResponseHandler`] - populate [`ResponseMetadata`] from headers
//! 2. [`ErrorResponseHandler`] - turn non-2xx responses into [`crate::ServiceError`]
//! 3. [`JsonResponseHandler`] - parse a 2xx JSON payload

mod error;
mod json;
mod metadata;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::response::{BceHttpResponse, ResponseMetadata};

pub use error::ErrorResponseHandler;
pub use json::JsonResponseHandler;
pub use metadata::MetadataResponseHandler;

/// What the handler chain has extracted so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseParts {
    /// Header-derived metadata
    pub metadata: ResponseMetadata,

    /// Parsed JSON payload, if the body had one
    pub payload: Option<serde_json::Value>,
}

/// One step of response processing
#[async_trait]
pub trait HttpResponseHandler: Send + Sync {
    /// Process the response; `Ok(true)` means no further handler runs.
    async fn handle(
        &self,
        http_response: &mut BceHttpResponse,
        response: &mut ResponseParts,
    ) -> Result<bool>;
}

/// The standard metadata, error, JSON chain
pub fn default_handlers() -> Vec<Arc<dyn HttpResponseHandler>> {
    vec![
        Arc::new(MetadataResponseHandler),
        Arc::new(ErrorResponseHandler),
        Arc::new(JsonResponseHandler),
    ]
}

/// Run `handlers` in order over a received response
///
/// The body is released before this returns, whatever the outcome.
pub async fn process(
    handlers: &[Arc<dyn HttpResponseHandler>],
    http_response: &mut BceHttpResponse,
) -> Result<ResponseParts> {
    let mut parts = ResponseParts::default();
    let outcome = run_chain(handlers, http_response, &mut parts).await;
    drop(http_response.take_content());
    outcome.map(|()| parts)
}

async fn run_chain(
    handlers: &[Arc<dyn HttpResponseHandler>],
    http_response: &mut BceHttpResponse,
    parts: &mut ResponseParts,
) -> Result<()> {
    for handler in handlers {
        if handler.handle(http_response, parts).await? {
            break;
        }
    }
    Ok(())
}
