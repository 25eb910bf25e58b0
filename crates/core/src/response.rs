//! Received response and typed response metadata
//!
//! [`BceHttpResponse`] is what a transport hands back: status, headers and an
//! owned body reader. Dropping the reader closes the body, so whoever takes it
//! out of the response is responsible for it until the end of its scope.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

use jiff::Timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tokio::io::AsyncRead;

/// Owned, boxed response body stream
pub type BoxedContent = Pin<Box<dyn AsyncRead + Send>>;

/// A response as received from the transport
pub struct BceHttpResponse {
    status_code: u16,
    status_text: String,
    headers: HashMap<String, String>,
    content: Option<BoxedContent>,
}

impl BceHttpResponse {
    /// Create a response; the status text defaults to the canonical reason phrase.
    pub fn new(status_code: u16) -> Self {
        let status_text = http::StatusCode::from_u16(status_code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status_code,
            status_text,
            headers: HashMap::new(),
            content: None,
        }
    }

    /// Override the status text
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Attach a body stream
    pub fn with_content(mut self, content: impl AsyncRead + Send + 'static) -> Self {
        self.content = Some(Box::pin(content));
        self
    }

    /// Attach an in-memory body
    pub fn with_body(self, body: impl Into<Vec<u8>>) -> Self {
        self.with_content(std::io::Cursor::new(body.into()))
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Look up a header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the body is still attached
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Take ownership of the body; it is closed when the returned value drops.
    pub fn take_content(&mut self) -> Option<BoxedContent> {
        self.content.take()
    }
}

impl fmt::Debug for BceHttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BceHttpResponse")
            .field("status_code", &self.status_code)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}

/// Metadata every typed response carries, filled from response headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub bce_request_id: Option<String>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub content_md5: Option<String>,
    pub content_encoding: Option<String>,
    pub content_disposition: Option<String>,
    pub transfer_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub etag: Option<String>,
    pub location: Option<String>,
    pub server: Option<String>,
    pub date: Option<Timestamp>,
    pub last_modified: Option<Timestamp>,
    pub expires: Option<Timestamp>,
}

/// A typed service response
///
/// Implementors deserialize from the JSON payload; the metadata field is
/// skipped by serde and filled in afterwards.
pub trait BceResponse: DeserializeOwned + Default + Send {
    fn metadata(&self) -> &ResponseMetadata;
    fn metadata_mut(&mut self) -> &mut ResponseMetadata;
}

/// Response for operations without a payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmptyResponse {
    #[serde(skip)]
    pub metadata: ResponseMetadata,
}

impl BceResponse for EmptyResponse {
    fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ResponseMetadata {
        &mut self.metadata
    }
}

/// Deserialize a field the service sends either as a JSON number or a string
///
/// Use with `#[serde(default, deserialize_with = "...")]` on an `Option<String>`.
pub fn number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}
