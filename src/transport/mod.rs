//! HTTP transport layer for S3 requests.
//!
//! The navigator only issues bodiless `GET` requests. Transports own
//! timeouts, pooling and TLS; the core defines none of its own. Every
//! transport applies [`HttpResponse::error_for_status`] so callers only ever
//! see successful responses.

use crate::error::{AuthenticationError, S3Error, TransportError};
use crate::signing::{sha256_hex, SignedRequest};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP `GET` request to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Header names a response cache must leave out of its key.
    pub cache_key_exclusions: Vec<String>,
}

impl HttpRequest {
    /// Create a new request for `url` with no headers.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: HashMap::new(),
            cache_key_exclusions: Vec::new(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add multiple headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Exclude a header from [`HttpRequest::cache_key`].
    pub fn with_cache_key_exclusion(mut self, name: impl Into<String>) -> Self {
        self.cache_key_exclusions.push(name.into());
        self
    }

    /// Deterministic cache key over the URL and the cacheable headers.
    ///
    /// Header names are compared case-insensitively, both for exclusion and
    /// for ordering, so two signings of the same URL share a key.
    pub fn cache_key(&self) -> String {
        let excluded: Vec<String> = self
            .cache_key_exclusions
            .iter()
            .map(|name| name.to_lowercase())
            .collect();

        let headers: BTreeMap<String, &str> = self
            .headers
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.as_str()))
            .filter(|(name, _)| !excluded.contains(name))
            .collect();

        let mut material = format!("GET {}\n", self.url);
        for (name, value) in headers {
            material.push_str(&name);
            material.push(':');
            material.push_str(value);
            material.push('\n');
        }
        sha256_hex(material.as_bytes())
    }
}

impl From<SignedRequest> for HttpRequest {
    fn from(signed: SignedRequest) -> Self {
        Self {
            url: signed.url,
            headers: signed.headers,
            cache_key_exclusions: signed.cache_key_exclusions,
        }
    }
}

/// HTTP response received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get the AWS request ID from response headers.
    pub fn request_id(&self) -> Option<&str> {
        self.get_header("x-amz-request-id")
    }

    /// Get the content type.
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
    }

    /// Turn a non-success status into an error.
    ///
    /// 401 and 403 mean the signed request was refused and become
    /// [`AuthenticationError::Rejected`]; every other non-2xx status becomes
    /// [`TransportError::HttpStatus`]. The body is not inspected.
    pub fn error_for_status(self) -> Result<Self, S3Error> {
        if self.is_success() {
            return Ok(self);
        }

        let request_id = self.request_id().map(str::to_string);
        match self.status {
            401 | 403 => Err(S3Error::Authentication(AuthenticationError::Rejected {
                status: self.status,
                request_id,
            })),
            status => Err(S3Error::Transport(TransportError::HttpStatus {
                status,
                request_id,
            })),
        }
    }
}

/// HTTP transport trait for making requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a `GET` request and return the successful response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, S3Error>;
}

/// Default HTTP transport using reqwest.
///
/// Bodies are returned as stored. A `Content-Encoding` header is passed
/// through and never decoded.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, S3Error> {
        Self::builder().build()
    }

    /// Create a transport builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, S3Error> {
        let mut req_builder = self.client.get(request.url.clone());

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        let response = req_builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await.map_err(|e| {
            S3Error::Transport(TransportError::ConnectionFailed {
                message: format!("Failed to read response body: {}", e),
            })
        })?;

        debug!(
            url = %request.url,
            status,
            bytes = body.len(),
            "Received S3 response"
        );

        HttpResponse {
            status,
            headers,
            body,
        }
        .error_for_status()
    }
}

fn map_reqwest_error(e: reqwest::Error) -> S3Error {
    if e.is_timeout() {
        S3Error::Transport(TransportError::Timeout {
            message: e.to_string(),
        })
    } else {
        S3Error::Transport(TransportError::ConnectionFailed {
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

/// Builder for reqwest transport.
pub struct ReqwestTransportBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Option<Duration>,
    verify_ssl: bool,
    user_agent: String,
}

impl ReqwestTransportBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 100,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            verify_ssl: true,
            user_agent: format!("aws-s3-navigator/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set the idle connection timeout.
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set whether to verify SSL certificates.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, S3Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| {
                S3Error::Transport(TransportError::Tls {
                    message: e.to_string(),
                })
            })?;

        Ok(ReqwestTransport { client })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
