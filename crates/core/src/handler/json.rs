use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use super::{HttpResponseHandler, ResponseParts};
use crate::error::Result;
use crate::response::BceHttpResponse;

/// Reads the body of a successful response as JSON
///
/// An absent or blank body leaves the payload empty; the typed response then
/// falls back to its default value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseHandler;

#[async_trait]
impl HttpResponseHandler for JsonResponseHandler {
    async fn handle(
        &self,
        http_response: &mut BceHttpResponse,
        response: &mut ResponseParts,
    ) -> Result<bool> {
        let Some(mut content) = http_response.take_content() else {
            return Ok(true);
        };

        let mut buf = Vec::new();
        content.read_to_end(&mut buf).await?;
        drop(content);

        if buf.iter().all(u8::is_ascii_whitespace) {
            return Ok(true);
        }
        response.payload = Some(serde_json::from_slice(&buf)?);
        Ok(true)
    }
}
