//! SES request and response models

use bce_core::response::number_or_string;
use bce_core::{BceResponse, ResponseMetadata};
use serde::Deserialize;

/// Verification record of a sender domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainDetail {
    /// The domain name
    pub domain_name: String,

    /// Verification status as reported by the service
    #[serde(deserialize_with = "number_or_string")]
    pub status: Option<String>,

    /// Verification token to publish in DNS
    pub token: Option<String>,
}

/// Response of `GET /v1/verifiedDomain/{domain}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetVerifiedDomainResponse {
    pub detail: DomainDetail,

    #[serde(skip)]
    pub metadata: ResponseMetadata,
}

impl BceResponse for GetVerifiedDomainResponse {
    fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ResponseMetadata {
        &mut self.metadata
    }
}
