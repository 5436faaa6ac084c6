//! S3 navigator client.
//!
//! [`S3Navigator::fetch`] is the single entry point: sign a `GET`, send it,
//! classify the request, and shape the body. Entries of a listing call back
//! into the same navigator when their contents are loaded.

use crate::config::NavigatorConfig;
use crate::error::{S3Error, ShapeError, UrlError};
use crate::navigation::classifier::{self, ResponseShape};
use crate::navigation::{Resource, ResourceFetcher};
use crate::signing::{AwsSigner, AwsSignerV4};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::types::ObjectSummary;
use crate::xml;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

const MARKER_PARAM: &str = "marker";

/// Signs, fetches and shapes S3 resources.
///
/// Cloning is cheap; clones share configuration, transport and signer.
#[derive(Clone)]
pub struct S3Navigator {
    config: Arc<NavigatorConfig>,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn AwsSigner>,
}

impl S3Navigator {
    /// Create a navigator signing with the configured credentials provider.
    pub fn new(config: NavigatorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let signer = Arc::new(AwsSignerV4::new(config.credentials_provider.clone()));
        Self::with_signer(config, transport, signer)
    }

    /// Create a navigator with an explicit signer.
    pub fn with_signer(
        config: NavigatorConfig,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn AwsSigner>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            signer,
        }
    }

    /// Create a builder.
    pub fn builder() -> S3NavigatorBuilder {
        S3NavigatorBuilder::new()
    }

    /// Get the navigator configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Fetch the resource at a fully-qualified S3 URL.
    pub async fn fetch(&self, url: &str) -> Result<Resource, S3Error> {
        let parsed = Url::parse(url).map_err(|e| {
            S3Error::UnrecognizedUrl(UrlError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            })
        })?;
        self.fetch_url(&parsed).await
    }

    /// Fetch the resource at `url`.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch_url(&self, url: &Url) -> Result<Resource, S3Error> {
        let (shape, response) = self.get(url).await?;
        debug!(?shape, bytes = response.body.len(), "Classified S3 response");

        let fetcher: Arc<dyn ResourceFetcher> = Arc::new(self.clone());
        match shape {
            ResponseShape::RawContent => Ok(Resource::RawContent(response.body)),
            ResponseShape::BucketListing => {
                let result = xml::parse_list_all_my_buckets(body_text(&response)?)?;
                let table = classifier::shape_bucket_listing(&result, url, fetcher);
                Ok(Resource::BucketListing(table))
            }
            ResponseShape::ObjectListing => {
                let objects = self.collect_object_pages(url, &response).await?;
                let table = classifier::shape_object_listing(&objects, url, fetcher);
                Ok(Resource::ObjectListing(table))
            }
        }
    }

    async fn get(&self, url: &Url) -> Result<(ResponseShape, HttpResponse), S3Error> {
        let signed = self.signer.sign_get(url).await?;
        let shape = classifier::classify(&signed.host, signed.url.path());
        let response = self.transport.send(HttpRequest::from(signed)).await?;
        Ok((shape, response))
    }

    /// Read the first listing page and, when allowed, the pages after it.
    async fn collect_object_pages(
        &self,
        url: &Url,
        first: &HttpResponse,
    ) -> Result<Vec<ObjectSummary>, S3Error> {
        let mut page = xml::parse_list_bucket_result(body_text(first)?)?;
        let mut objects = Vec::new();
        let mut pages_fetched: u32 = 1;
        let mut last_marker: Option<String> = None;

        loop {
            let marker = page.continuation_marker().map(str::to_string);
            objects.append(&mut page.contents);

            let marker = match marker {
                Some(marker) => marker,
                None => break,
            };
            if !self.config.follow_truncated_listings {
                debug!(objects = objects.len(), "Listing truncated, not following");
                break;
            }
            if pages_fetched >= self.config.max_listing_pages {
                warn!(
                    pages = pages_fetched,
                    objects = objects.len(),
                    "Listing page limit reached, returning partial listing"
                );
                break;
            }
            if last_marker.as_deref() == Some(marker.as_str()) {
                warn!(%marker, "Listing marker did not advance, stopping");
                break;
            }

            let next_url = with_marker(url, &marker);
            let (_, response) = self.get(&next_url).await?;
            page = xml::parse_list_bucket_result(body_text(&response)?)?;
            pages_fetched += 1;
            last_marker = Some(marker);
        }

        debug!(pages = pages_fetched, objects = objects.len(), "Collected object listing");
        Ok(objects)
    }
}

#[async_trait]
impl ResourceFetcher for S3Navigator {
    async fn fetch_resource(&self, url: &Url) -> Result<Resource, S3Error> {
        self.fetch_url(url).await
    }
}

impl std::fmt::Debug for S3Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Navigator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The listing URL with its `marker` parameter replaced.
fn with_marker(url: &Url, marker: &str) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != MARKER_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut next = url.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(MARKER_PARAM, marker);
    next
}

fn body_text(response: &HttpResponse) -> Result<&str, S3Error> {
    std::str::from_utf8(&response.body).map_err(|e| {
        S3Error::ShapeMismatch(ShapeError::XmlParse {
            message: format!("listing body is not UTF-8: {}", e),
        })
    })
}

/// Builder for [`S3Navigator`].
pub struct S3NavigatorBuilder {
    config: Option<NavigatorConfig>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
    signer: Option<Arc<dyn AwsSigner>>,
}

impl S3NavigatorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            from_env: false,
            transport: None,
            signer: None,
        }
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom signer instead of one built from the credentials provider.
    pub fn signer(mut self, signer: Arc<dyn AwsSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the navigator.
    pub fn build(self) -> Result<S3Navigator, S3Error> {
        let config = if let Some(config) = self.config {
            config
        } else if self.from_env {
            NavigatorConfig::builder().from_env().build()?
        } else {
            NavigatorConfig::default()
        };

        let transport = if let Some(transport) = self.transport {
            transport
        } else {
            let builder = ReqwestTransport::builder()
                .connect_timeout(config.connect_timeout)
                .read_timeout(config.read_timeout)
                .pool_max_idle_per_host(config.max_connections as usize)
                .pool_idle_timeout(Some(config.idle_timeout))
                .verify_ssl(config.verify_ssl)
                .user_agent(config.user_agent.clone());

            Arc::new(builder.build()?)
        };

        Ok(match self.signer {
            Some(signer) => S3Navigator::with_signer(config, transport, signer),
            None => S3Navigator::new(config, transport),
        })
    }
}

impl Default for S3NavigatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
