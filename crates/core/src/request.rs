//! Outbound request description
//!
//! [`InternalRequest`] is built by service clients, annotated with default
//! headers and a signature by [`crate::BceClient`], and handed to an
//! [`crate::HttpTransport`] to be sent.

use std::collections::BTreeMap;

use http::Method;
use serde::Serialize;
use url::Url;

use crate::auth::canonical;
use crate::error::Result;
use crate::headers;

/// An unsent request: method, URI, headers, query parameters and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalRequest {
    method: Method,
    uri: Url,
    headers: BTreeMap<String, String>,
    parameters: BTreeMap<String, String>,
    content: Option<Vec<u8>>,
}

impl InternalRequest {
    /// Create a request; any query string already on `uri` is dropped,
    /// parameters are carried separately.
    pub fn new(method: Method, mut uri: Url) -> Self {
        uri.set_query(None);
        uri.set_fragment(None);
        Self {
            method,
            uri,
            headers: BTreeMap::new(),
            parameters: BTreeMap::new(),
            content: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The URI without query string
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Headers, keyed by lower-case name
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Look up a header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Set a header; a later call with any casing of the same name replaces it.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Query parameters
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    /// Request body
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Set the body and its Content-Length
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        let content = content.into();
        self.set_header(headers::CONTENT_LENGTH, content.len().to_string());
        self.content = Some(content);
    }

    /// Serialize `value` as the JSON body
    pub fn set_json_content<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let body = serde_json::to_vec(value)?;
        self.set_content(body);
        Ok(())
    }

    /// Full URL including the encoded query string
    pub fn url(&self) -> Url {
        let mut url = self.uri.clone();
        if !self.parameters.is_empty() {
            let query = canonical::query_string(
                self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
            url.set_query(Some(&query));
        }
        url
    }
}
