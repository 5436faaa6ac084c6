//! AWS S3 Navigator
//!
//! SigV4-signed, read-only access to Amazon S3 that turns responses into a
//! lazily expandable tree of buckets and objects.
//!
//! # Features
//!
//! - **AWS Signature V4**: canonical requests, signing key derivation and
//!   `Authorization` headers for bodiless `GET` requests
//! - **Both addressing styles**: virtual-hosted and path-style URLs, dotted
//!   and legacy dashed regional hosts
//! - **Navigation**: bucket lists and object listings become keyed tables
//!   whose entries fetch their own contents on demand
//! - **Pluggable collaborators**: credentials and HTTP transport are
//!   injected through traits
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use s3_navigator::Resource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), s3_navigator::S3Error> {
//!     let navigator = s3_navigator::create_navigator_from_env()?;
//!
//!     if let Resource::BucketListing(buckets) = navigator.fetch("https://s3.amazonaws.com/").await? {
//!         for bucket in &buckets {
//!             let objects = bucket.contents.load().await?;
//!             println!("{}: {:?}", bucket.name, objects.shape());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mocks;
pub mod navigation;
pub mod signing;
pub mod transport;
pub mod types;
pub mod xml;

// Re-export main types at crate root
pub use client::{S3Navigator, S3NavigatorBuilder};
pub use config::{NavigatorConfig, NavigatorConfigBuilder};
pub use credentials::{
    AwsCredentials, CredentialsProvider, EnvCredentialsProvider, StaticCredentialsProvider,
};
pub use error::{
    AuthenticationError, ConfigurationError, S3Error, ShapeError, TransportError, UrlError,
};
pub use navigation::{
    LazyContents, NavigationTable, NavigationTableBuilder, Resource, ResourceFetcher,
    ResponseShape, S3Entry, TableKind,
};
pub use signing::{AwsSigner, AwsSignerV4, HostDescriptor, SignedRequest};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    BucketSummary, ListAllMyBucketsResult, ListBucketResult, ObjectSummary, Owner, StorageClass,
};

/// Create a navigator from environment variables.
///
/// Credentials come from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`,
/// read each time a request is signed. Transport and pagination settings
/// come from the `S3_NAVIGATOR_*` variables.
///
/// # Example
///
/// ```rust,no_run
/// let navigator = s3_navigator::create_navigator_from_env()?;
/// # Ok::<(), s3_navigator::S3Error>(())
/// ```
pub fn create_navigator_from_env() -> Result<S3Navigator> {
    S3NavigatorBuilder::new().from_env().build()
}

/// Create a navigator with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use s3_navigator::{AwsCredentials, NavigatorConfig, StaticCredentialsProvider};
///
/// let config = NavigatorConfig::builder()
///     .credentials_provider(Arc::new(StaticCredentialsProvider::new(
///         AwsCredentials::new("AKID", "SECRET"),
///     )))
///     .build()?;
///
/// let navigator = s3_navigator::create_navigator(config)?;
/// # Ok::<(), s3_navigator::S3Error>(())
/// ```
pub fn create_navigator(config: NavigatorConfig) -> Result<S3Navigator> {
    S3NavigatorBuilder::new().config(config).build()
}

/// Result type alias for navigator operations.
pub type Result<T> = std::result::Result<T, S3Error>;
