//! S3 host name parsing.
//!
//! S3 endpoints come in several spellings that must all resolve to the same
//! region and bucket:
//!
//! - `s3.amazonaws.com` (us-east-1, path style)
//! - `s3.eu-west-1.amazonaws.com` (dotted region)
//! - `s3-eu-west-1.amazonaws.com` (legacy dashed region)
//! - `mybucket.s3.amazonaws.com` and friends (virtual-hosted bucket)
//!
//! Anything else is rejected outright rather than guessed at.

use crate::error::{S3Error, UrlError};
use std::fmt;

/// Region assumed for endpoints that do not name one.
pub const DEFAULT_REGION: &str = "us-east-1";

const S3_LABEL: &str = "s3";
const LEGACY_REGION_PREFIX: &str = "s3-";

/// Service, region and bucket recovered from an S3 host name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostDescriptor {
    service: String,
    region: String,
    bucket: Option<String>,
}

impl HostDescriptor {
    /// Parse a bare host name (no scheme, port or path).
    pub fn parse(host: &str) -> Result<Self, S3Error> {
        let unrecognized = || {
            S3Error::UnrecognizedUrl(UrlError::UnrecognizedHost {
                host: host.to_string(),
            })
        };

        let mut segments: Vec<&str> = host.split('.').collect();

        let bucket = match segments.first() {
            Some(first) if *first == S3_LABEL || first.starts_with(LEGACY_REGION_PREFIX) => None,
            Some(first) => {
                let bucket = first.to_string();
                segments.remove(0);
                Some(bucket)
            }
            None => return Err(unrecognized()),
        };

        // "s3-eu-west-1" carries the region inside the service label.
        if let Some(region) = segments
            .first()
            .and_then(|first| first.strip_prefix(LEGACY_REGION_PREFIX))
        {
            let mut rewritten = Vec::with_capacity(segments.len() + 1);
            rewritten.push(S3_LABEL);
            rewritten.push(region);
            rewritten.extend_from_slice(&segments[1..]);
            segments = rewritten;
        }

        let n = segments.len();
        if !(n == 3 || n == 4)
            || segments[0] != S3_LABEL
            || segments[n - 2] != "amazonaws"
            || segments[n - 1] != "com"
        {
            return Err(unrecognized());
        }

        let region = if n == 3 { DEFAULT_REGION } else { segments[1] };

        Ok(Self {
            service: S3_LABEL.to_string(),
            region: region.to_string(),
            bucket,
        })
    }

    /// Service name used in the credential scope. Always `s3`.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region used in the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Bucket named by a virtual-hosted host, if any.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// True when the bucket is part of the host name.
    pub fn is_virtual_hosted(&self) -> bool {
        self.bucket.is_some()
    }
}

impl fmt::Display for HostDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bucket {
            Some(bucket) => write!(f, "{}/{} (bucket {})", self.service, self.region, bucket),
            None => write!(f, "{}/{}", self.service, self.region),
        }
    }
}
