//! `bce-auth-v1` request signer
//!
//! ```text
//! authStringPrefix = bce-auth-v1/{accessKey}/{timestamp}/{expirationInSeconds}
//! signingKey       = hex(HMAC-SHA256(secretKey, authStringPrefix))
//! signature        = hex(HMAC-SHA256(signingKey, canonicalRequest))
//! Authorization    = {authStringPrefix}/{signedHeaders}/{signature}
//! ```
//!
//! The signing key is scoped to the access key, time and validity window, so
//! the raw secret never signs a request directly.

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;
use url::Url;

use super::canonical;
use super::{SignOptions, Signature, Signer};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::headers;
use crate::request::InternalRequest;

type HmacSha256 = Hmac<Sha256>;

/// Signing protocol version, first field of the authorization header
pub const BCE_AUTH_VERSION: &str = "bce-auth-v1";

/// Default validity window of a signature
pub const DEFAULT_EXPIRATION_IN_SECONDS: u32 = 1800;

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SSZ` (UTC, no fractional seconds)
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Signer for the BCE v1 authorization scheme
#[derive(Debug, Clone, Copy, Default)]
pub struct BceV1Signer;

impl BceV1Signer {
    pub fn new() -> Self {
        Self
    }
}

impl Signer for BceV1Signer {
    fn sign(
        &self,
        request: &mut InternalRequest,
        credentials: &Credentials,
        options: &SignOptions,
    ) -> Result<Signature> {
        let host = host_header(request.uri())?;
        request.set_header(headers::HOST, host);
        if let Some(token) = credentials.session_token() {
            request.set_header(headers::BCE_SECURITY_TOKEN, token);
        }

        let timestamp = format_timestamp(options.timestamp.unwrap_or_else(Timestamp::now));
        request.set_header(headers::BCE_DATE, timestamp.as_str());

        let auth_string_prefix = format!(
            "{BCE_AUTH_VERSION}/{}/{timestamp}/{}",
            credentials.access_key(),
            options.expiration_in_seconds
        );
        let signing_key = hex::encode(hmac_sha256(
            credentials.secret_key().as_bytes(),
            auth_string_prefix.as_bytes(),
        ));

        let selected = canonical::headers_to_sign(
            request
                .headers()
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
            options.headers_to_sign.as_ref(),
        );
        let canonical_request = canonical::build_canonical_request(
            request.method().as_str(),
            &canonical::canonical_uri(request.uri().path()),
            &canonical::canonical_query_string(
                request
                    .parameters()
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            ),
            &canonical::canonical_headers(&selected),
        );
        tracing::trace!(%canonical_request, "canonical request");

        let signature = hex::encode(hmac_sha256(
            signing_key.as_bytes(),
            canonical_request.as_bytes(),
        ));
        let signed_headers: Vec<String> = selected.into_keys().collect();
        let authorization = format!(
            "{auth_string_prefix}/{}/{signature}",
            signed_headers.join(";")
        );
        request.set_header(headers::AUTHORIZATION, authorization.as_str());

        tracing::debug!(
            access_key = credentials.access_key(),
            %timestamp,
            signed_headers = %signed_headers.join(";"),
            "signed request"
        );

        Ok(Signature {
            authorization,
            signature,
            signed_headers,
            timestamp,
            expiration_in_seconds: options.expiration_in_seconds,
        })
    }
}

/// Host header value: the host plus any non-default port
fn host_header(uri: &Url) -> Result<String> {
    let host = uri
        .host_str()
        .ok_or_else(|| Error::InvalidRequest(format!("request URI has no host: {uri}")))?;
    // Url::port() is None when the port is the scheme default.
    Ok(match uri.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

fn hmac_sha256(key: &[u8], msg: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(msg);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn fixed_time() -> Timestamp {
        "2015-04-27T08:23:49Z".parse().unwrap()
    }

    fn credentials() -> Credentials {
        Credentials::new("ab47bb3f6d8b4c8e9a5f2b3c1d0e9f8a", "9d7c3b1a5e4f4a2b8c6d0e1f2a3b4c5d").unwrap()
    }

    fn request() -> InternalRequest {
        let uri = Url::parse("http://bj.bcebos.com/v1/test/myfolder/readme.txt").unwrap();
        let mut req = InternalRequest::new(Method::PUT, uri);
        req.set_header("Content-Type", "text/plain");
        req.set_header("Content-Length", "8");
        req.set_header("Content-Md5", "0a52730597fb4ffa01fc117d9e71e3a9");
        req.set_header("x-bce-meta-author", "baidu");
        req.set_header("User-Agent", "sdk");
        req.add_parameter("partNumber", "9");
        req.add_parameter("uploadId", "a44cc9bab11cbd156984767aad637851");
        req
    }

    fn options() -> SignOptions {
        SignOptions::default().with_timestamp(fixed_time())
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(fixed_time()), "2015-04-27T08:23:49Z");
        let with_fraction: Timestamp = "2015-04-27T08:23:49.987Z".parse().unwrap();
        assert_eq!(format_timestamp(with_fraction), "2015-04-27T08:23:49Z");
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = BceV1Signer::new();
        let mut first = request();
        let mut second = request();

        let a = signer.sign(&mut first, &credentials(), &options()).unwrap();
        let b = signer.sign(&mut second, &credentials(), &options()).unwrap();

        assert_eq!(a, b);
        assert_eq!(first.header("authorization"), second.header("authorization"));
    }

    #[test]
    fn test_authorization_wire_format() {
        let signer = BceV1Signer::new();
        let mut req = request();
        let sig = signer.sign(&mut req, &credentials(), &options()).unwrap();

        let fields: Vec<&str> = sig.authorization.split('/').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], "bce-auth-v1");
        assert_eq!(fields[1], "ab47bb3f6d8b4c8e9a5f2b3c1d0e9f8a");
        assert_eq!(fields[2], "2015-04-27T08:23:49Z");
        assert_eq!(fields[3], "1800");
        assert_eq!(
            fields[4],
            "content-length;content-md5;content-type;host;x-bce-date;x-bce-meta-author"
        );
        assert_eq!(fields[5], sig.signature);
        assert_eq!(sig.signature.len(), 64);
        assert!(sig.signature.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(req.header("Authorization"), Some(sig.authorization.as_str()));
    }

    #[test]
    fn test_sign_sets_host_and_date() {
        let signer = BceV1Signer::new();
        let mut req = request();
        signer.sign(&mut req, &credentials(), &options()).unwrap();

        assert_eq!(req.header("host"), Some("bj.bcebos.com"));
        assert_eq!(req.header("x-bce-date"), Some("2015-04-27T08:23:49Z"));
        assert!(req.header("x-bce-security-token").is_none());
    }

    #[test]
    fn test_host_keeps_non_default_port() {
        let uri = Url::parse("http://localhost:8080/v1/x").unwrap();
        assert_eq!(host_header(&uri).unwrap(), "localhost:8080");

        let uri = Url::parse("https://ses.bj.baidubce.com:443/v1/x").unwrap();
        assert_eq!(host_header(&uri).unwrap(), "ses.bj.baidubce.com");
    }

    #[test]
    fn test_signature_matches_manual_computation() {
        let signer = BceV1Signer::new();
        let mut req = request();
        let sig = signer.sign(&mut req, &credentials(), &options()).unwrap();

        let prefix = "bce-auth-v1/ab47bb3f6d8b4c8e9a5f2b3c1d0e9f8a/2015-04-27T08:23:49Z/1800";
        let signing_key = hex::encode(hmac_sha256(
            b"9d7c3b1a5e4f4a2b8c6d0e1f2a3b4c5d",
            prefix.as_bytes(),
        ));
        let canonical_request = "PUT\n\
            /v1/test/myfolder/readme.txt\n\
            partNumber=9&uploadId=a44cc9bab11cbd156984767aad637851\n\
            content-length:8\n\
            content-md5:0a52730597fb4ffa01fc117d9e71e3a9\n\
            content-type:text%2Fplain\n\
            host:bj.bcebos.com\n\
            x-bce-date:2015-04-27T08%3A23%3A49Z\n\
            x-bce-meta-author:baidu";
        let expected = hex::encode(hmac_sha256(
            signing_key.as_bytes(),
            canonical_request.as_bytes(),
        ));

        assert_eq!(sig.signature, expected);
    }

    #[test]
    fn test_signature_changes_with_inputs() {
        let signer = BceV1Signer::new();
        let base = signer.sign(&mut request(), &credentials(), &options()).unwrap();

        let later = options().with_timestamp("2015-04-27T08:23:50Z".parse().unwrap());
        let moved = signer.sign(&mut request(), &credentials(), &later).unwrap();
        assert_ne!(base.signature, moved.signature);

        let other_key = Credentials::new("ab47bb3f6d8b4c8e9a5f2b3c1d0e9f8a", "other").unwrap();
        let rekeyed = signer.sign(&mut request(), &other_key, &options()).unwrap();
        assert_ne!(base.signature, rekeyed.signature);

        let mut req = request();
        req.add_parameter("partNumber", "10");
        let changed = signer.sign(&mut req, &credentials(), &options()).unwrap();
        assert_ne!(base.signature, changed.signature);
    }

    #[test]
    fn test_query_order_does_not_change_signature() {
        let signer = BceV1Signer::new();
        let uri = Url::parse("http://bj.bcebos.com/v1/bucket").unwrap();

        let mut forward = InternalRequest::new(Method::GET, uri.clone());
        forward.add_parameter("marker", "a");
        forward.add_parameter("prefix", "b");

        let mut reverse = InternalRequest::new(Method::GET, uri);
        reverse.add_parameter("prefix", "b");
        reverse.add_parameter("marker", "a");

        let a = signer.sign(&mut forward, &credentials(), &options()).unwrap();
        let b = signer.sign(&mut reverse, &credentials(), &options()).unwrap();
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_explicit_headers_to_sign() {
        let signer = BceV1Signer::new();
        let mut req = request();
        let opts = options().with_headers_to_sign(["Host", "User-Agent"]);
        let sig = signer.sign(&mut req, &credentials(), &opts).unwrap();

        assert_eq!(sig.signed_headers, vec!["host", "user-agent"]);
        assert!(sig.authorization.contains("/host;user-agent/"));
    }

    #[test]
    fn test_custom_expiration() {
        let signer = BceV1Signer::new();
        let opts = options().with_expiration(3600);
        let sig = signer.sign(&mut request(), &credentials(), &opts).unwrap();
        assert_eq!(sig.expiration_in_seconds, 3600);
        assert!(sig.authorization.contains("/2015-04-27T08:23:49Z/3600/"));
    }

    #[test]
    fn test_session_token_is_signed() {
        let signer = BceV1Signer::new();
        let creds = Credentials::with_session_token("ak", "sk", "sts-token").unwrap();
        let mut req = request();
        let sig = signer.sign(&mut req, &creds, &options()).unwrap();

        assert_eq!(req.header("x-bce-security-token"), Some("sts-token"));
        assert!(sig.signed_headers.contains(&"x-bce-security-token".to_string()));
    }
}
