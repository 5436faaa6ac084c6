//! AWS Signature V4 signing implementation.
//!
//! This module implements the AWS Signature V4 signing process for S3 `GET`
//! requests: host parsing, canonical request creation, signing key
//! derivation, and signature calculation.

pub mod canonical;
pub mod host;
mod signer;

pub use host::HostDescriptor;
pub use signer::{authorization_header, sign_get_at, AwsSigner, AwsSignerV4, SignedRequest};

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// AWS Signature V4 algorithm identifier.
pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name for S3.
pub const S3_SERVICE: &str = "s3";

/// Terminator of every credential scope.
pub const SCOPE_TERMINATOR: &str = "aws4_request";

/// Hex SHA-256 of the empty payload.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Calculate SHA-256 hash of data.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Calculate HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Date, time, region and service a single request is signed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    date_stamp: String,
    amz_date: String,
    region: String,
    service: String,
}

impl SigningContext {
    /// Build the context for a request sent at `timestamp`.
    pub fn new(timestamp: &DateTime<Utc>, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            date_stamp: format_date_stamp(timestamp),
            amz_date: format_datetime(timestamp),
            region: region.into(),
            service: service.into(),
        }
    }

    /// `YYYYMMDD`.
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }

    /// `YYYYMMDD'T'HHMMSS'Z'`, the `x-amz-date` value.
    pub fn amz_date(&self) -> &str {
        &self.amz_date
    }

    /// Region of the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service of the credential scope.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// `{date}/{region}/{service}/aws4_request`.
    pub fn credential_scope(&self) -> String {
        build_credential_scope(&self.date_stamp, &self.region, &self.service)
    }
}

/// Derived signing key. Zeroed when dropped and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Sign `message` and return the hex-encoded MAC.
    pub fn sign(&self, message: &str) -> String {
        hex::encode(hmac_sha256(&self.0, message.as_bytes()))
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

/// Generate the signing key for AWS Signature V4.
///
/// kDate = HMAC("AWS4" + SecretKey, Date)
/// kRegion = HMAC(kDate, Region)
/// kService = HMAC(kRegion, Service)
/// kSigning = HMAC(kService, "aws4_request")
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> SigningKey {
    let mut k_secret = format!("AWS4{}", secret_key);
    let mut k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes());
    let mut k_region = hmac_sha256(&k_date, region.as_bytes());
    let mut k_service = hmac_sha256(&k_region, service.as_bytes());
    let signing = hmac_sha256(&k_service, SCOPE_TERMINATOR.as_bytes());

    k_secret.zeroize();
    k_date.zeroize();
    k_region.zeroize();
    k_service.zeroize();

    SigningKey(signing)
}

/// Build the credential scope string.
///
/// Format: `{date}/{region}/{service}/aws4_request`
pub fn build_credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/{}", date_stamp, region, service, SCOPE_TERMINATOR)
}

/// Build the string to sign from a credential scope and canonical request hash.
pub fn build_string_to_sign(amz_date: &str, credential_scope: &str, canonical_request_hash: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        AWS_ALGORITHM, amz_date, credential_scope, canonical_request_hash
    )
}

/// Format a timestamp for AWS signatures.
///
/// Returns the date-time in `YYYYMMDD'T'HHMMSS'Z'` format.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format a date stamp for AWS signatures.
///
/// Returns the date in `YYYYMMDD` format.
pub fn format_date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}
