//! Listing documents returned by S3 `GET` requests.

use super::common::*;
use chrono::{DateTime, Utc};

/// One `<Contents>` element of a `ListBucketResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, quotes included as S3 returns it.
    pub e_tag: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Storage class.
    pub storage_class: Option<StorageClass>,
}

/// Response to a `GET` on a bucket root (ListObjects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBucketResult {
    /// Bucket name.
    pub name: Option<String>,
    /// Prefix the listing was restricted to.
    pub prefix: Option<String>,
    /// Marker the listing started after.
    pub marker: Option<String>,
    /// Marker for the next page, when S3 supplies one.
    pub next_marker: Option<String>,
    /// Maximum keys per page.
    pub max_keys: Option<u32>,
    /// More keys follow this page.
    pub is_truncated: bool,
    /// Objects on this page.
    pub contents: Vec<ObjectSummary>,
}

impl ListBucketResult {
    /// Marker to request the page after this one.
    ///
    /// S3 only returns `NextMarker` when a delimiter was used; otherwise the
    /// last key of the page is the marker.
    pub fn continuation_marker(&self) -> Option<&str> {
        if !self.is_truncated {
            return None;
        }
        self.next_marker
            .as_deref()
            .or_else(|| self.contents.last().map(|o| o.key.as_str()))
    }
}

/// One `<Bucket>` element of a `ListAllMyBucketsResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    pub creation_date: Option<DateTime<Utc>>,
}

/// Response to a `GET` on the service root (ListBuckets).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllMyBucketsResult {
    /// Owner of the buckets.
    pub owner: Option<Owner>,
    /// Buckets owned by the caller.
    pub buckets: Vec<BucketSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(key: &str) -> ObjectSummary {
        ObjectSummary {
            key: key.to_string(),
            last_modified: None,
            e_tag: None,
            size: None,
            storage_class: None,
        }
    }

    #[test]
    fn test_continuation_marker() {
        let mut page = ListBucketResult {
            contents: vec![object("a"), object("b")],
            ..Default::default()
        };
        assert_eq!(page.continuation_marker(), None);

        page.is_truncated = true;
        assert_eq!(page.continuation_marker(), Some("b"));

        page.next_marker = Some("z".to_string());
        assert_eq!(page.continuation_marker(), Some("z"));
    }

    #[test]
    fn test_continuation_marker_empty_truncated_page() {
        let page = ListBucketResult {
            is_truncated: true,
            ..Default::default()
        };
        assert_eq!(page.continuation_marker(), None);
    }
}
