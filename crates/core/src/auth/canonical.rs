//! Canonical request construction for BCE v1 signing
//!
//! ```text
//! HTTPMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders
//! ```
//!
//! The service recomputes the same string to verify a signature, so every
//! rule here (encoding set, casing, ordering, trimming) is part of the wire
//! contract.

use std::collections::{BTreeMap, BTreeSet};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::headers;

/// Everything except RFC 3986 unreserved characters is percent-encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string with the unreserved set, upper-case hex
///
/// ```
/// use bce_core::auth::canonical::normalize;
///
/// assert_eq!(normalize("a b/c"), "a%20b%2Fc");
/// assert_eq!(normalize("A-Z_0.9~"), "A-Z_0.9~");
/// ```
#[must_use]
pub fn normalize(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Build the canonical URI from a request path
///
/// Each segment is decoded first and then encoded, so an already-encoded
/// path and its raw form canonicalize identically. `/` is preserved and an
/// empty path becomes `/`.
#[must_use]
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    let encoded = path
        .split('/')
        .map(|segment| normalize(&percent_decode_str(segment).decode_utf8_lossy()))
        .collect::<Vec<_>>()
        .join("/");

    if encoded.starts_with('/') {
        encoded
    } else {
        format!("/{encoded}")
    }
}

/// Encode and sort query parameters by encoded key, then encoded value
fn encoded_pairs<'a>(
    parameters: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = parameters
        .into_iter()
        .map(|(k, v)| (normalize(k), normalize(v)))
        .collect();
    pairs.sort_unstable();
    pairs
}

fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical query string
///
/// An `authorization` parameter (any casing) is excluded so that a signature
/// carried in the query never signs itself.
///
/// ```
/// use bce_core::auth::canonical::canonical_query_string;
///
/// assert_eq!(canonical_query_string([("b", "2"), ("a", "1")]), "a=1&b=2");
/// ```
#[must_use]
pub fn canonical_query_string<'a>(parameters: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let pairs = encoded_pairs(
        parameters
            .into_iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(headers::AUTHORIZATION)),
    );
    join_pairs(&pairs)
}

/// Build the query string sent on the wire, with the same encoding and order
#[must_use]
pub fn query_string<'a>(parameters: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    join_pairs(&encoded_pairs(parameters))
}

/// Whether a header is signed when no explicit allow-list is given
#[must_use]
pub fn is_default_header_to_sign(name: &str) -> bool {
    matches!(
        name,
        headers::HOST | headers::CONTENT_LENGTH | headers::CONTENT_TYPE | headers::CONTENT_MD5
    ) || name.starts_with(headers::BCE_PREFIX)
}

/// Select the headers to sign
///
/// Names are trimmed and lower-cased, values trimmed; headers with empty
/// values are skipped. When several inputs map to the same lower-cased name
/// the last one wins. `allow_list` entries must already be lower-case.
#[must_use]
pub fn headers_to_sign<'a>(
    request_headers: impl IntoIterator<Item = (&'a str, &'a str)>,
    allow_list: Option<&BTreeSet<String>>,
) -> BTreeMap<String, String> {
    let mut selected = BTreeMap::new();
    for (name, value) in request_headers {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let wanted = match allow_list {
            Some(list) => list.contains(&name),
            None => is_default_header_to_sign(&name),
        };
        if wanted {
            selected.insert(name, value.to_owned());
        }
    }
    selected
}

/// Build the canonical headers string from already-selected headers
///
/// Each line is `encoded-name:encoded-value`; lines are sorted and joined with
/// `\n`, without a trailing newline.
#[must_use]
pub fn canonical_headers(selected: &BTreeMap<String, String>) -> String {
    let mut lines: Vec<String> = selected
        .iter()
        .map(|(name, value)| format!("{}:{}", normalize(name), normalize(value)))
        .collect();
    lines.sort_unstable();
    lines.join("\n")
}

/// Build the full canonical request string
#[must_use]
pub fn build_canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    canonical_headers: &str,
) -> String {
    format!(
        "{}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}",
        method.to_ascii_uppercase()
    )
}
