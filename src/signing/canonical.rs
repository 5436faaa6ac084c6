//! Canonical request building for AWS Signature V4.
//!
//! Only bodiless `GET` requests are ever signed, so the signed header set is
//! fixed to `host` and `x-amz-date` and the payload hash is always the hash
//! of the empty string.

use super::{sha256_hex, EMPTY_PAYLOAD_SHA256};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Names of the signed headers, in canonical order.
pub const SIGNED_HEADERS: &str = "host;x-amz-date";

/// Characters that should NOT be percent-encoded in URI paths.
const URI_PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Characters that should NOT be percent-encoded in query strings.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URI-encode a path, keeping `/` separators.
pub fn uri_encode_path(path: &str) -> String {
    utf8_percent_encode(path, URI_PATH_SET).to_string()
}

/// URI-encode a query parameter name or value.
pub fn uri_encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_SET).to_string()
}

/// Build the canonical URI from a URL path.
///
/// The path is decoded first so that keys already escaped by the URL parser
/// are not escaped twice.
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let decoded = percent_decode_str(path).decode_utf8_lossy();
    if decoded.starts_with('/') {
        uri_encode_path(&decoded)
    } else {
        format!("/{}", uri_encode_path(&decoded))
    }
}

/// Collect the query parameters of a URL, decoded, keyed by name.
///
/// Repeated names are not supported; the last occurrence wins.
pub fn query_params(url: &Url) -> BTreeMap<String, String> {
    url.query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

/// Build the canonical query string.
///
/// Names are ordered by their raw byte value (the map's order) and both
/// names and values are percent-encoded with the RFC 3986 unreserved set
/// left intact.
pub fn build_canonical_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{}={}", uri_encode_query(name), uri_encode_query(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers block: one line per signed header.
pub fn build_canonical_headers(host: &str, amz_date: &str) -> String {
    format!("host:{}\nx-amz-date:{}\n", host.trim(), amz_date.trim())
}

/// A canonical `GET` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    uri: String,
    query: String,
    headers: String,
}

impl CanonicalRequest {
    /// Build the canonical request for a `GET` of `path` with `params`.
    pub fn new(path: &str, params: &BTreeMap<String, String>, host: &str, amz_date: &str) -> Self {
        Self {
            uri: build_canonical_uri(path),
            query: build_canonical_query_string(params),
            headers: build_canonical_headers(host, amz_date),
        }
    }

    /// The canonical URI component.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The canonical query string component.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hex-encoded SHA-256 of the canonical request.
    pub fn hash(&self) -> String {
        sha256_hex(self.to_string().as_bytes())
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GET\n{}\n{}\n{}\n{}\n{}",
            self.uri, self.query, self.headers, SIGNED_HEADERS, EMPTY_PAYLOAD_SHA256
        )
    }
}
