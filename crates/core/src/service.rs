//! Service identity and endpoint derivation
//!
//! Every service client declares its identifier explicitly. The identifier is
//! validated when the client is constructed, and the default endpoint is
//! derived from it as `{protocol}://{service}[.{region}].baidubce.com`.

use std::fmt;

use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// The default service domain for BCE
pub const DEFAULT_SERVICE_DOMAIN: &str = "baidubce.com";

/// The common URL prefix for all BCE service APIs
pub const URL_PREFIX: &str = "v1";

/// A validated service identifier such as `ses` or `bcc`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceId(String);

impl ServiceId {
    /// Validate and wrap a service identifier
    ///
    /// The identifier becomes a DNS label, so only ASCII lowercase letters
    /// and digits are accepted, starting with a letter.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let mut chars = id.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !valid {
            return Err(Error::InvalidServiceId(format!(
                "'{id}': expected lowercase letters and digits, starting with a letter"
            )));
        }
        Ok(Self(id))
    }

    /// The identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static description of a service a client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Service identifier
    pub id: ServiceId,

    /// Whether the service has per-region endpoints
    pub region_supported: bool,
}

impl ServiceSpec {
    /// A regional service
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: ServiceId::new(id)?,
            region_supported: true,
        })
    }

    /// A service with a single global endpoint
    pub fn global(id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: ServiceId::new(id)?,
            region_supported: false,
        })
    }

    /// Resolve the endpoint for this service
    ///
    /// An endpoint set in the configuration wins; otherwise one is derived
    /// from the protocol, the service id and (for regional services) the
    /// region.
    pub fn endpoint(&self, config: &ClientConfig) -> Result<Url> {
        let endpoint = match &config.endpoint {
            Some(endpoint) => endpoint.clone(),
            None if self.region_supported => format!(
                "{}://{}.{}.{}",
                config.protocol, self.id, config.region, DEFAULT_SERVICE_DOMAIN
            ),
            None => format!("{}://{}.{}", config.protocol, self.id, DEFAULT_SERVICE_DOMAIN),
        };
        parse_endpoint(&endpoint)
    }
}

/// Parse an endpoint, requiring an absolute http(s) URL with a host
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| Error::InvalidEndpoint(format!("{endpoint}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::InvalidEndpoint(format!("{endpoint}: missing host")));
    }

    Ok(url)
}
