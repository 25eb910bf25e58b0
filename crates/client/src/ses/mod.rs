//! Simple Email Service (SES) client

pub mod model;

use std::sync::Arc;

use bce_core::{BceClient, ClientConfig, Error, HttpTransport, Result, ServiceSpec};
use reqwest::Method;

use crate::transport::ReqwestTransport;

pub use model::{DomainDetail, GetVerifiedDomainResponse};

/// Service identifier of SES
pub const SERVICE_ID: &str = "ses";

/// Client for the SES API
#[derive(Debug, Clone)]
pub struct SesClient {
    client: BceClient,
}

impl SesClient {
    /// Create a client that sends requests with [`ReqwestTransport`]
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client on a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let client = BceClient::new(ServiceSpec::new(SERVICE_ID)?, config, transport)?;
        Ok(Self { client })
    }

    /// The underlying client
    pub fn inner(&self) -> &BceClient {
        &self.client
    }

    /// Get the verification record of a sender domain
    pub async fn get_verified_domain(&self, domain: &str) -> Result<GetVerifiedDomainResponse> {
        if domain.trim().is_empty() {
            return Err(Error::InvalidRequest("domain name should not be empty".into()));
        }

        let request = self
            .client
            .create_request(Method::GET, &["verifiedDomain", domain])?;
        self.client.invoke(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bce_core::{BceHttpResponse, Credentials, ErrorType, InternalRequest};
    use std::sync::Mutex;

    /// Replies with a canned response and records every request
    struct CannedTransport {
        status: u16,
        body: &'static str,
        sent: Mutex<Vec<InternalRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn send(&self, request: &InternalRequest) -> Result<BceHttpResponse> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(BceHttpResponse::new(self.status)
                .with_header("content-length", self.body.len().to_string())
                .with_header("x-bce-request-id", "req-ses")
                .with_body(self.body))
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new(Credentials::new("ak", "sk").unwrap())
    }

    #[test]
    fn test_default_endpoint() {
        let client = SesClient::new(config()).unwrap();
        assert_eq!(
            client.inner().endpoint().as_str(),
            "http://ses.bj.baidubce.com/"
        );
        assert_eq!(client.inner().service_id().as_str(), "ses");
    }

    #[tokio::test]
    async fn test_get_verified_domain() {
        let transport = CannedTransport::new(
            200,
            r#"{"detail":{"domainName":"example.com","status":0,"token":"t0k"}}"#,
        );
        let client = SesClient::with_transport(config(), transport.clone()).unwrap();

        let resp = client.get_verified_domain("example.com").await.unwrap();
        assert_eq!(resp.detail.domain_name, "example.com");
        assert_eq!(resp.detail.token.as_deref(), Some("t0k"));
        assert_eq!(resp.metadata.bce_request_id.as_deref(), Some("req-ses"));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method(), Method::GET);
        assert_eq!(sent[0].uri().path(), "/v1/verifiedDomain/example.com");
        assert!(
            sent[0]
                .header("authorization")
                .is_some_and(|a| a.starts_with("bce-auth-v1/ak/"))
        );
    }

    #[tokio::test]
    async fn test_get_verified_domain_not_found() {
        let transport = CannedTransport::new(
            404,
            r#"{"code":"NoSuchDomain","message":"domain not found","requestId":"req-404"}"#,
        );
        let client = SesClient::with_transport(config(), transport).unwrap();

        let err = client.get_verified_domain("missing.com").await.unwrap_err();
        let service = err.as_service_error().unwrap();
        assert_eq!(service.error_type, ErrorType::Client);
        assert_eq!(service.code.as_deref(), Some("NoSuchDomain"));
        assert_eq!(service.request_id.as_deref(), Some("req-404"));
    }

    #[tokio::test]
    async fn test_empty_domain_rejected_before_sending() {
        let transport = CannedTransport::new(200, "{}");
        let client = SesClient::with_transport(config(), transport.clone()).unwrap();

        for domain in ["", "   "] {
            let err = client.get_verified_domain(domain).await.unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)));
        }
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
