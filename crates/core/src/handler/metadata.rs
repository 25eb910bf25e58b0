use async_trait::async_trait;
use jiff::Timestamp;

use super::{HttpResponseHandler, ResponseParts};
use crate::error::Result;
use crate::headers;
use crate::response::{BceHttpResponse, ResponseMetadata};

/// Fills [`ResponseMetadata`] from response headers; never stops the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataResponseHandler;

#[async_trait]
impl HttpResponseHandler for MetadataResponseHandler {
    async fn handle(
        &self,
        http_response: &mut BceHttpResponse,
        response: &mut ResponseParts,
    ) -> Result<bool> {
        populate(http_response, &mut response.metadata);
        Ok(false)
    }
}

fn populate(http_response: &BceHttpResponse, metadata: &mut ResponseMetadata) {
    let text = |name: &str| http_response.header(name).map(str::to_owned);

    metadata.bce_request_id = text(headers::BCE_REQUEST_ID);
    metadata.content_length = http_response
        .header(headers::CONTENT_LENGTH)
        .and_then(|v| v.trim().parse().ok());
    metadata.content_type = text(headers::CONTENT_TYPE);
    metadata.content_md5 = text(headers::CONTENT_MD5);
    metadata.content_encoding = text(headers::CONTENT_ENCODING);
    metadata.content_disposition = text(headers::CONTENT_DISPOSITION);
    metadata.transfer_encoding = text(headers::TRANSFER_ENCODING);
    metadata.cache_control = text(headers::CACHE_CONTROL);
    metadata.etag = http_response
        .header(headers::ETAG)
        .map(|v| v.trim_matches('"').to_owned());
    metadata.location = text(headers::LOCATION);
    metadata.server = text(headers::SERVER);
    metadata.date = http_response.header(headers::DATE).and_then(parse_http_date);
    metadata.last_modified = http_response
        .header(headers::LAST_MODIFIED)
        .and_then(parse_http_date);
    metadata.expires = http_response
        .header(headers::EXPIRES)
        .and_then(parse_http_date);
}

/// Parse an RFC 1123 date such as `Tue, 15 Nov 1994 08:12:31 GMT`
///
/// Unparseable dates are logged and dropped.
fn parse_http_date(value: &str) -> Option<Timestamp> {
    match jiff::fmt::rfc2822::parse(value.trim()) {
        Ok(zoned) => Some(zoned.timestamp()),
        Err(e) => {
            tracing::debug!(value, error = %e, "ignoring unparseable date header");
            None
        }
    }
}
