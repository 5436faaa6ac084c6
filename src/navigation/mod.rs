//! Navigable view of S3 responses.
//!
//! A fetch produces a [`Resource`]: either a table of entries or the raw
//! bytes of an object. Every entry carries a [`LazyContents`] handle that
//! fetches the entry's own URL on demand, so a bucket tree is only walked as
//! far as the consumer asks.

pub mod classifier;

pub use classifier::{classify, ResponseShape};

use crate::error::{S3Error, UrlError};
use crate::types::StorageClass;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Column holding the expandable contents of every entry.
pub const CONTENT_COLUMN: &str = "Content";

/// Anything that can turn an S3 URL into a [`Resource`].
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch, sign and classify `url`.
    async fn fetch_resource(&self, url: &Url) -> Result<Resource, S3Error>;
}

/// Deferred contents of an entry.
///
/// Nothing is fetched until [`LazyContents::load`] is called, and every call
/// performs a fresh fetch. An entry whose name has no faithful URL carries
/// the error instead, and every load returns it.
#[derive(Clone)]
pub struct LazyContents {
    target: Result<Url, UrlError>,
    fetcher: Arc<dyn ResourceFetcher>,
}

impl LazyContents {
    /// Create a handle that fetches `url` through `fetcher`.
    pub fn new(url: Url, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            target: Ok(url),
            fetcher,
        }
    }

    /// Create a handle whose every load fails with `error`.
    pub fn unaddressable(error: UrlError, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            target: Err(error),
            fetcher,
        }
    }

    /// URL the contents are fetched from, if the entry has one.
    pub fn url(&self) -> Option<&Url> {
        self.target.as_ref().ok()
    }

    /// Fetch the contents.
    pub async fn load(&self) -> Result<Resource, S3Error> {
        match &self.target {
            Ok(url) => self.fetcher.fetch_resource(url).await,
            Err(error) => Err(S3Error::UnrecognizedUrl(error.clone())),
        }
    }
}

impl PartialEq for LazyContents {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl Eq for LazyContents {}

impl fmt::Debug for LazyContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Ok(url) => f.debug_tuple("LazyContents").field(&url.as_str()).finish(),
            Err(error) => f.debug_tuple("LazyContents").field(error).finish(),
        }
    }
}

/// One bucket or object in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Entry {
    /// Bucket name or object key.
    pub name: String,
    /// Last modification time (objects only).
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag (objects only).
    pub e_tag: Option<String>,
    /// Size in bytes (objects only).
    pub size: Option<u64>,
    /// Storage class (objects only).
    pub storage_class: Option<StorageClass>,
    /// Deferred fetch of this entry's URL.
    pub contents: LazyContents,
}

impl S3Entry {
    /// Create an entry with only a name and contents handle.
    pub fn new(name: impl Into<String>, contents: LazyContents) -> Self {
        Self {
            name: name.into(),
            last_modified: None,
            e_tag: None,
            size: None,
            storage_class: None,
            contents,
        }
    }
}

/// What a table lists, which fixes its name column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Buckets of an account.
    Buckets,
    /// Objects of a bucket.
    Objects,
}

impl TableKind {
    /// Column holding the display name.
    pub fn name_column(&self) -> &'static str {
        match self {
            TableKind::Buckets => "Name",
            TableKind::Objects => "Key",
        }
    }
}

/// A keyed, deduplicated collection of entries.
///
/// Entries are ordered by the raw bytes of their names and there is exactly
/// one entry per distinct name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTable {
    kind: TableKind,
    entries: BTreeMap<String, S3Entry>,
}

impl NavigationTable {
    /// Start building a table.
    pub fn builder(kind: TableKind) -> NavigationTableBuilder {
        NavigationTableBuilder::new(kind)
    }

    /// What this table lists.
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Column holding the display name ("Name" or "Key").
    pub fn name_column(&self) -> &'static str {
        self.kind.name_column()
    }

    /// Column holding the expandable contents.
    pub fn content_column(&self) -> &'static str {
        CONTENT_COLUMN
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&S3Entry> {
        self.entries.get(name)
    }

    /// Entry names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in name order.
    pub fn iter(&self) -> btree_map::Values<'_, String, S3Entry> {
        self.entries.values()
    }
}

impl<'a> IntoIterator for &'a NavigationTable {
    type Item = &'a S3Entry;
    type IntoIter = btree_map::Values<'a, String, S3Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl IntoIterator for NavigationTable {
    type Item = S3Entry;
    type IntoIter = btree_map::IntoValues<String, S3Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

/// Builder for [`NavigationTable`].
///
/// Inserting a name twice keeps the later entry.
#[derive(Debug)]
pub struct NavigationTableBuilder {
    kind: TableKind,
    entries: BTreeMap<String, S3Entry>,
}

impl NavigationTableBuilder {
    /// Create an empty builder.
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Add an entry.
    pub fn entry(mut self, entry: S3Entry) -> Self {
        self.push(entry);
        self
    }

    /// Add an entry in place.
    pub fn push(&mut self, entry: S3Entry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Build the table.
    pub fn build(self) -> NavigationTable {
        NavigationTable {
            kind: self.kind,
            entries: self.entries,
        }
    }
}

impl Extend<S3Entry> for NavigationTableBuilder {
    fn extend<I: IntoIterator<Item = S3Entry>>(&mut self, iter: I) {
        for entry in iter {
            self.push(entry);
        }
    }
}

/// Result of fetching an S3 URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// The buckets of the account.
    BucketListing(NavigationTable),
    /// The objects of a bucket.
    ObjectListing(NavigationTable),
    /// Object bytes, unmodified.
    RawContent(Bytes),
}

impl Resource {
    /// Shape this resource was classified as.
    pub fn shape(&self) -> ResponseShape {
        match self {
            Resource::BucketListing(_) => ResponseShape::BucketListing,
            Resource::ObjectListing(_) => ResponseShape::ObjectListing,
            Resource::RawContent(_) => ResponseShape::RawContent,
        }
    }

    /// The table, for either listing shape.
    pub fn as_table(&self) -> Option<&NavigationTable> {
        match self {
            Resource::BucketListing(table) | Resource::ObjectListing(table) => Some(table),
            Resource::RawContent(_) => None,
        }
    }

    /// The raw bytes, for object content.
    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Resource::RawContent(bytes) => Some(bytes),
            _ => None,
        }
    }
}
