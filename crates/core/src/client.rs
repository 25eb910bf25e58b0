//! Service client orchestrator
//!
//! [`BceClient`] ties the pieces together: it builds requests relative to the
//! service endpoint, attaches default headers, signs, sends through an
//! [`HttpTransport`] and runs the response handler chain.

use std::sync::Arc;

use http::Method;
use jiff::Timestamp;
use url::Url;

use crate::auth::{BceV1Signer, SignOptions, Signer};
use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::handler::{self, HttpResponseHandler};
use crate::headers;
use crate::request::InternalRequest;
use crate::response::BceResponse;
use crate::service::{ServiceId, ServiceSpec, URL_PREFIX};
use crate::traits::HttpTransport;

/// Shared machinery of every service client
#[derive(Clone)]
pub struct BceClient {
    service: ServiceSpec,
    endpoint: Url,
    config: ClientConfig,
    credentials: Credentials,
    signer: Arc<dyn Signer>,
    sign_options: SignOptions,
    transport: Arc<dyn HttpTransport>,
    handlers: Vec<Arc<dyn HttpResponseHandler>>,
}

impl BceClient {
    /// Create a client for `service`
    ///
    /// Fails if the configuration has no credentials or the endpoint cannot
    /// be resolved.
    pub fn new(
        service: ServiceSpec,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let credentials = config.require_credentials()?.clone();
        let endpoint = service.endpoint(&config)?;
        tracing::debug!(service = %service.id, %endpoint, "created client");

        Ok(Self {
            service,
            endpoint,
            config,
            credentials,
            signer: Arc::new(BceV1Signer::new()),
            sign_options: SignOptions::default(),
            transport,
            handlers: handler::default_handlers(),
        })
    }

    /// Replace the response handler chain
    pub fn with_handlers(mut self, handlers: Vec<Arc<dyn HttpResponseHandler>>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Replace the signer
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = signer;
        self
    }

    /// Sign every request with these options (expiration, header allow-list)
    ///
    /// A fixed timestamp here applies to all requests; leave it unset to sign
    /// with the current time.
    pub fn with_sign_options(mut self, sign_options: SignOptions) -> Self {
        self.sign_options = sign_options;
        self
    }

    pub fn sign_options(&self) -> &SignOptions {
        &self.sign_options
    }

    pub fn service_id(&self) -> &ServiceId {
        &self.service.id
    }

    /// The resolved endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request for `/v1/{path...}` on the endpoint
    ///
    /// Each element of `path` becomes one URL segment and is escaped as such.
    pub fn create_request(&self, method: Method, path: &[&str]) -> Result<InternalRequest> {
        let mut uri = self.endpoint.clone();
        {
            let mut segments = uri.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!("{}: cannot be a base URL", self.endpoint))
            })?;
            segments.pop_if_empty().push(URL_PREFIX);
            segments.extend(path.iter().copied());
        }
        Ok(InternalRequest::new(method, uri))
    }

    /// Sign, send and decode a request
    pub async fn invoke<T: BceResponse>(&self, mut request: InternalRequest) -> Result<T> {
        self.prepare(&mut request);
        self.signer
            .sign(&mut request, &self.credentials, &self.sign_options)?;

        tracing::debug!(
            service = %self.service.id,
            method = %request.method(),
            uri = %request.uri(),
            "sending request"
        );
        let mut http_response = self.transport.send(&request).await?;
        let parts = handler::process(&self.handlers, &mut http_response).await?;

        let mut response: T = match parts.payload {
            Some(payload) => serde_json::from_value(payload)?,
            None => T::default(),
        };
        *response.metadata_mut() = parts.metadata;
        Ok(response)
    }

    fn prepare(&self, request: &mut InternalRequest) {
        if !request.has_header(headers::CONTENT_TYPE) {
            request.set_header(headers::CONTENT_TYPE, headers::DEFAULT_CONTENT_TYPE);
        }
        if !request.has_header(headers::DATE) {
            request.set_header(headers::DATE, http_date(Timestamp::now()));
        }
        request.set_header(headers::USER_AGENT, self.config.user_agent.as_str());
    }
}

impl std::fmt::Debug for BceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BceClient")
            .field("service", &self.service.id)
            .field("endpoint", &self.endpoint.as_str())
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

/// Format a timestamp as an RFC 1123 date, e.g. `Tue, 15 Nov 1994 08:12:31 GMT`
fn http_date(timestamp: Timestamp) -> String {
    timestamp.strftime("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
