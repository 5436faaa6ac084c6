//! Configuration types for the S3 navigator.
//!
//! `NavigatorConfig` carries the injected credentials provider, the settings
//! of the default reqwest transport, and the listing pagination policy.

use crate::credentials::{CredentialsProvider, EnvCredentialsProvider};
use crate::error::{ConfigurationError, S3Error};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the S3 navigator.
#[derive(Clone)]
pub struct NavigatorConfig {
    /// Credentials provider, asked for credentials on every signed request.
    pub credentials_provider: Arc<dyn CredentialsProvider>,

    /// Connection timeout of the default transport.
    pub connect_timeout: Duration,

    /// Read timeout of the default transport.
    pub read_timeout: Duration,

    /// Maximum idle connections per host in the default transport.
    pub max_connections: u32,

    /// Idle connection timeout.
    pub idle_timeout: Duration,

    /// Verify SSL certificates.
    pub verify_ssl: bool,

    /// User-Agent sent by the default transport.
    pub user_agent: String,

    /// Follow `IsTruncated` object listings with `marker` requests.
    pub follow_truncated_listings: bool,

    /// Maximum number of pages fetched for one object listing.
    pub max_listing_pages: u32,
}

impl std::fmt::Debug for NavigatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigatorConfig")
            .field("credentials_provider", &self.credentials_provider.name())
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_connections", &self.max_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("verify_ssl", &self.verify_ssl)
            .field("user_agent", &self.user_agent)
            .field("follow_truncated_listings", &self.follow_truncated_listings)
            .field("max_listing_pages", &self.max_listing_pages)
            .finish()
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            credentials_provider: Arc::new(EnvCredentialsProvider::new()),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            max_connections: 100,
            idle_timeout: Duration::from_secs(90),
            verify_ssl: true,
            user_agent: format!("aws-s3-navigator/{}", env!("CARGO_PKG_VERSION")),
            follow_truncated_listings: true,
            max_listing_pages: 100,
        }
    }
}

impl NavigatorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> NavigatorConfigBuilder {
        NavigatorConfigBuilder::default()
    }
}

/// Builder for navigator configuration.
#[derive(Default)]
pub struct NavigatorConfigBuilder {
    credentials_provider: Option<Arc<dyn CredentialsProvider>>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    max_connections: Option<u32>,
    idle_timeout: Option<Duration>,
    verify_ssl: Option<bool>,
    user_agent: Option<String>,
    follow_truncated_listings: Option<bool>,
    max_listing_pages: Option<u32>,
}

impl NavigatorConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credentials provider.
    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials_provider = Some(provider);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the maximum connections in the pool.
    pub fn max_connections(mut self, connections: u32) -> Self {
        self.max_connections = Some(connections);
        self
    }

    /// Set the idle connection timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Enable or disable SSL verification.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Follow truncated object listings.
    pub fn follow_truncated_listings(mut self, enabled: bool) -> Self {
        self.follow_truncated_listings = Some(enabled);
        self
    }

    /// Set the maximum number of listing pages.
    pub fn max_listing_pages(mut self, pages: u32) -> Self {
        self.max_listing_pages = Some(pages);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable values are ignored and leave the field unset.
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("S3_NAVIGATOR_CONNECT_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.connect_timeout = Some(Duration::from_millis(ms));
            }
        }
        if let Ok(val) = std::env::var("S3_NAVIGATOR_READ_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.read_timeout = Some(Duration::from_millis(ms));
            }
        }
        if let Ok(val) = std::env::var("S3_NAVIGATOR_MAX_CONNECTIONS") {
            if let Ok(connections) = val.parse() {
                self.max_connections = Some(connections);
            }
        }
        if let Ok(val) = std::env::var("S3_NAVIGATOR_VERIFY_SSL") {
            self.verify_ssl = Some(val.to_lowercase() != "false");
        }
        if let Ok(val) = std::env::var("S3_NAVIGATOR_FOLLOW_TRUNCATED") {
            self.follow_truncated_listings = Some(val.to_lowercase() == "true");
        }
        if let Ok(val) = std::env::var("S3_NAVIGATOR_MAX_LISTING_PAGES") {
            if let Ok(pages) = val.parse() {
                self.max_listing_pages = Some(pages);
            }
        }

        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<NavigatorConfig, S3Error> {
        let defaults = NavigatorConfig::default();

        let read_timeout = self.read_timeout.unwrap_or(defaults.read_timeout);
        if read_timeout.is_zero() {
            return Err(S3Error::Configuration(
                ConfigurationError::InvalidConfiguration {
                    field: "read_timeout".to_string(),
                    message: "Read timeout must be greater than zero".to_string(),
                },
            ));
        }

        let max_listing_pages = self.max_listing_pages.unwrap_or(defaults.max_listing_pages);
        if max_listing_pages == 0 {
            return Err(S3Error::Configuration(
                ConfigurationError::InvalidConfiguration {
                    field: "max_listing_pages".to_string(),
                    message: "At least one listing page must be allowed".to_string(),
                },
            ));
        }

        Ok(NavigatorConfig {
            credentials_provider: self
                .credentials_provider
                .unwrap_or(defaults.credentials_provider),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            read_timeout,
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            idle_timeout: self.idle_timeout.unwrap_or(defaults.idle_timeout),
            verify_ssl: self.verify_ssl.unwrap_or(defaults.verify_ssl),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            follow_truncated_listings: self
                .follow_truncated_listings
                .unwrap_or(defaults.follow_truncated_listings),
            max_listing_pages,
        })
    }
}
