//! Request authentication
//!
//! - [`canonical`] - canonical request construction
//! - [`v1`] - the `bce-auth-v1` signer

pub mod canonical;
pub mod v1;

use std::collections::BTreeSet;

use jiff::Timestamp;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::request::InternalRequest;

pub use v1::{BCE_AUTH_VERSION, BceV1Signer, DEFAULT_EXPIRATION_IN_SECONDS};

/// Options controlling a single signing operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOptions {
    /// Signing time; `None` means now
    pub timestamp: Option<Timestamp>,

    /// How long the signature stays valid
    pub expiration_in_seconds: u32,

    /// Explicit lower-case header allow-list; `None` selects the default set
    pub headers_to_sign: Option<BTreeSet<String>>,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            timestamp: None,
            expiration_in_seconds: DEFAULT_EXPIRATION_IN_SECONDS,
            headers_to_sign: None,
        }
    }
}

impl SignOptions {
    /// Sign as of a fixed time
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the validity window
    pub fn with_expiration(mut self, seconds: u32) -> Self {
        self.expiration_in_seconds = seconds;
        self
    }

    /// Sign exactly these headers (names are lower-cased)
    pub fn with_headers_to_sign<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.headers_to_sign = Some(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_ascii_lowercase())
                .collect(),
        );
        self
    }
}

/// The outcome of signing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Value placed in the `Authorization` header
    pub authorization: String,

    /// Hex-encoded HMAC over the canonical request
    pub signature: String,

    /// Lower-case names of the signed headers, sorted
    pub signed_headers: Vec<String>,

    /// Signing time in wire format
    pub timestamp: String,

    /// Validity window in seconds
    pub expiration_in_seconds: u32,
}

/// Computes and attaches a request signature
pub trait Signer: Send + Sync {
    /// Sign `request` in place and return what was signed
    fn sign(
        &self,
        request: &mut InternalRequest,
        credentials: &Credentials,
        options: &SignOptions,
    ) -> Result<Signature>;
}
