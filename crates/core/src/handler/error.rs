use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncReadExt;

use super::{HttpResponseHandler, ResponseParts};
use crate::error::{Error, Result, ServiceError};
use crate::response::{BceHttpResponse, BoxedContent, number_or_string};

/// JSON error document returned by BCE services
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorResponse {
    #[serde(deserialize_with = "number_or_string")]
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

/// Converts every non-2xx response into [`Error::Service`]
///
/// The error body is parsed only when the response declares a positive
/// Content-Length, and at most that many bytes are read. If no message can be
/// recovered the status text is used instead and the request id comes from
/// the response metadata. The body is closed on every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorResponseHandler;

#[async_trait]
impl HttpResponseHandler for ErrorResponseHandler {
    async fn handle(
        &self,
        http_response: &mut BceHttpResponse,
        response: &mut ResponseParts,
    ) -> Result<bool> {
        let status_code = http_response.status_code();
        if status_code / 100 == 2 {
            return Ok(false);
        }

        let parsed = match (http_response.take_content(), response.metadata.content_length) {
            (Some(content), Some(len)) if len > 0 => read_error_body(content, len).await,
            _ => None,
        };

        let error = match parsed {
            Some(ErrorResponse {
                code,
                message: Some(message),
                request_id,
            }) => ServiceError::new(message, status_code)
                .with_code(code)
                .with_request_id(request_id),
            _ => {
                tracing::debug!(status_code, "no error message in body, using status text");
                ServiceError::new(http_response.status_text(), status_code)
                    .with_request_id(response.metadata.bce_request_id.clone())
            }
        };

        tracing::warn!(
            status_code,
            error_type = %error.error_type,
            code = error.code.as_deref().unwrap_or("-"),
            request_id = error.request_id.as_deref().unwrap_or("-"),
            "service returned an error"
        );
        Err(Error::Service(error))
    }
}

/// Read and decode an error body, consuming (and so closing) it
async fn read_error_body(content: BoxedContent, len: u64) -> Option<ErrorResponse> {
    let mut buf = Vec::new();
    if let Err(e) = content.take(len).read_to_end(&mut buf).await {
        tracing::debug!(error = %e, "failed to read error body");
        return None;
    }
    match serde_json::from_slice(&buf) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(error = %e, "error body is not valid JSON");
            None
        }
    }
}
