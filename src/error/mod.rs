//! Error types for the S3 navigator.
//!
//! Errors are grouped by where they originate: the request URL, the
//! credential source or the server's verdict on a signature, the HTTP
//! transport, the shape of the response body, and client configuration.
//! Every failure is terminal for the fetch that produced it.

use thiserror::Error;

/// Top-level error type for the S3 navigator.
#[derive(Debug, Error)]
pub enum S3Error {
    /// The request URL does not address S3.
    #[error("Unrecognized URL: {0}")]
    UnrecognizedUrl(#[from] UrlError),

    /// Credentials were unavailable or the signed request was rejected.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Network and HTTP-layer errors.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body did not have the structure its shape requires.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl S3Error {
    /// Returns the HTTP status code if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            S3Error::Authentication(AuthenticationError::Rejected { status, .. }) => Some(*status),
            S3Error::Transport(TransportError::HttpStatus { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            S3Error::Authentication(AuthenticationError::Rejected { request_id, .. })
            | S3Error::Transport(TransportError::HttpStatus { request_id, .. }) => {
                request_id.as_deref()
            }
            _ => None,
        }
    }

    /// Returns true if the error was caused by the URL rather than by I/O.
    pub fn is_unrecognized_url(&self) -> bool {
        matches!(self, S3Error::UnrecognizedUrl(_))
    }
}

/// Errors raised while interpreting the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The host is not an S3 endpoint this client understands.
    #[error("'{host}' is not a recognized S3 host")]
    UnrecognizedHost {
        /// The rejected host name.
        host: String,
    },

    /// The URL could not be parsed at all.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The URL as supplied.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The URL has no host component.
    #[error("URL '{url}' has no host")]
    MissingHost {
        /// The URL as supplied.
        url: String,
    },

    /// A listed key has `.` or `..` path segments, which URL normalization
    /// would resolve to a different object.
    #[error("key '{key}' cannot be addressed by URL: it has a '.' or '..' path segment")]
    UnaddressableKey {
        /// The listed key or bucket name.
        key: String,
    },
}

/// Credential and authorization errors.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// No credentials could be loaded.
    #[error("Credentials not found: no access key / secret key pair is available")]
    CredentialsNotFound,

    /// Credentials were found but are unusable.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials {
        /// Details about why credentials are invalid.
        message: String,
    },

    /// The server refused the signed request.
    #[error("Request rejected with status {status}")]
    Rejected {
        /// HTTP status code (401 or 403).
        status: u16,
        /// AWS request ID.
        request_id: Option<String>,
    },
}

/// Network and HTTP-layer errors, passed through from the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message.
        message: String,
    },

    /// Request timed out.
    #[error("Request timed out: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// TLS setup or handshake error.
    #[error("TLS error: {message}")]
    Tls {
        /// Error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP status {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// AWS request ID.
        request_id: Option<String>,
    },
}

/// The response body does not match the expected document structure.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The body is not well-formed XML.
    #[error("XML parse error: {message}")]
    XmlParse {
        /// Error message.
        message: String,
    },

    /// The document root is not the one the listing shape requires.
    #[error("expected <{expected}> document, found <{actual}>")]
    UnexpectedRoot {
        /// Expected root element.
        expected: String,
        /// Actual root element (empty for an empty body).
        actual: String,
    },

    /// A required element is missing.
    #[error("missing required element <{element}>")]
    MissingElement {
        /// The missing element path.
        element: String,
    },

    /// An element holds a value of the wrong type.
    #[error("invalid value '{value}' for <{field}>")]
    InvalidField {
        /// The element name.
        field: String,
        /// The offending text.
        value: String,
    },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfiguration {
        /// The configuration field name.
        field: String,
        /// Error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        let rejected = S3Error::Authentication(AuthenticationError::Rejected {
            status: 403,
            request_id: Some("REQ123".into()),
        });
        assert_eq!(rejected.status_code(), Some(403));
        assert_eq!(rejected.request_id(), Some("REQ123"));

        let http = S3Error::Transport(TransportError::HttpStatus {
            status: 404,
            request_id: None,
        });
        assert_eq!(http.status_code(), Some(404));
        assert!(http.request_id().is_none());

        let shape = S3Error::ShapeMismatch(ShapeError::MissingElement {
            element: "Key".into(),
        });
        assert!(shape.status_code().is_none());
    }

    #[test]
    fn test_unrecognized_url_display() {
        let err: S3Error = UrlError::UnrecognizedHost {
            host: "example.com".into(),
        }
        .into();
        assert!(err.is_unrecognized_url());
        assert_eq!(
            err.to_string(),
            "Unrecognized URL: 'example.com' is not a recognized S3 host"
        );
    }

    #[test]
    fn test_shape_error_display() {
        let err = ShapeError::UnexpectedRoot {
            expected: "ListBucketResult".into(),
            actual: "Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "expected <ListBucketResult> document, found <Error>"
        );
    }
}
