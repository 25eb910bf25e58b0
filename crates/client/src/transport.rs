//! reqwest-backed transport
//!
//! Sends an [`InternalRequest`] as-is (the orchestrator has already signed it)
//! and hands the body back as a stream, so the handler chain decides how much
//! of it to read.

use std::collections::BTreeMap;
use std::io;

use async_trait::async_trait;
use bce_core::{BceHttpResponse, Error, HttpTransport, InternalRequest, Result, TimeoutConfig};
use futures::TryStreamExt;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio_util::io::StreamReader;

/// HTTP transport built on a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given timeouts
    pub fn new(timeout: &TimeoutConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(timeout.connect())
            .read_timeout(timeout.read())
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Wrap an existing client
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &InternalRequest) -> Result<BceHttpResponse> {
        let mut builder = self
            .http_client
            .request(request.method().clone(), request.url())
            .headers(header_map(request.headers())?);
        if let Some(content) = request.content() {
            builder = builder.body(content.to_vec());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {e}")))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "received response");

        let mut http_response = BceHttpResponse::new(status.as_u16());
        for (name, value) in response.headers() {
            match value.to_str() {
                Ok(value) => http_response = http_response.with_header(name.as_str(), value),
                Err(_) => tracing::debug!(header = %name, "skipping non-ASCII response header"),
            }
        }

        let body = StreamReader::new(response.bytes_stream().map_err(io::Error::other));
        Ok(http_response.with_content(body))
    }
}

/// Convert request headers, rejecting names or values HTTP cannot carry
fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::InvalidRequest(format!("Invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::try_from(value.as_str())
            .map_err(|e| Error::InvalidRequest(format!("Invalid value for header '{name}': {e}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bce_core::ErrorType;
    use bce_core::handler::{default_handlers, process};
    use reqwest::Method;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    /// Serve one canned HTTP response and return what the client sent
    async fn serve_once(response: &'static str) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&received).into_owned()
        });
        let url = Url::parse(&format!("http://{addr}/v1/verifiedDomain/example.com")).unwrap();
        (url, handle)
    }

    #[test]
    fn test_header_map() {
        let mut headers = BTreeMap::new();
        headers.insert("x-bce-date".to_string(), "2024-01-01T00:00:00Z".to_string());
        headers.insert("host".to_string(), "ses.bj.baidubce.com".to_string());

        let map = header_map(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["x-bce-date"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_header_map_rejects_invalid_value() {
        let mut headers = BTreeMap::new();
        headers.insert("x-bce-meta".to_string(), "line\nbreak".to_string());

        let err = header_map(&headers).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_send_success() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\n\
             Content-Type: application/json\r\n\
             Content-Length: 15\r\n\
             x-bce-request-id: req-ok\r\n\
             Connection: close\r\n\r\n\
             {\"detail\":null}",
        )
        .await;

        let transport = ReqwestTransport::new(&TimeoutConfig::default()).unwrap();
        let mut request = InternalRequest::new(Method::GET, url);
        request.set_header("x-bce-date", "2024-01-01T00:00:00Z");
        request.add_parameter("a", "1");

        let mut response = transport.send(&request).await.unwrap();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.header("x-bce-request-id"), Some("req-ok"));

        let mut body = String::new();
        response
            .take_content()
            .unwrap()
            .read_to_string(&mut body)
            .await
            .unwrap();
        assert_eq!(body, "{\"detail\":null}");

        let sent = server.await.unwrap().to_ascii_lowercase();
        assert!(sent.starts_with("get /v1/verifieddomain/example.com?a=1 http/1.1"));
        assert!(sent.contains("x-bce-date: 2024-01-01t00:00:00z"));
    }

    #[tokio::test]
    async fn test_send_error_response_is_classified() {
        let (url, server) = serve_once(
            "HTTP/1.1 403 Forbidden\r\n\
             Content-Length: 27\r\n\
             Connection: close\r\n\r\n\
             {\"message\":\"Access Denied\"}",
        )
        .await;

        let transport = ReqwestTransport::new(&TimeoutConfig::default()).unwrap();
        let request = InternalRequest::new(Method::GET, url);
        let mut response = transport.send(&request).await.unwrap();

        let err = process(&default_handlers(), &mut response).await.unwrap_err();
        let service = err.as_service_error().unwrap();
        assert_eq!(service.error_type, ErrorType::Client);
        assert_eq!(service.message, "Access Denied");
        assert_eq!(service.status_code, 403);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new(&TimeoutConfig::default()).unwrap();
        let url = Url::parse(&format!("http://{addr}/v1/x")).unwrap();
        let err = transport
            .send(&InternalRequest::new(Method::GET, url))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
