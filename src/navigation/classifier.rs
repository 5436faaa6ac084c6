//! Response classification and shaping.
//!
//! The shape of a response is decided from the request alone, before the
//! body is read:
//!
//! 1. Object listing: the bucket root of a virtual-hosted URL (`/`), or a
//!    path-style URL whose path is a single segment (`/mybucket`).
//! 2. Bucket listing: `/` on a host that names no bucket.
//! 3. Raw content: everything else.
//!
//! Rule 1's path-style test is a heuristic. `/mybucket/` has a second `/`
//! and is therefore fetched as raw content, like any object key.

use super::{LazyContents, NavigationTable, NavigationTableBuilder, ResourceFetcher, S3Entry, TableKind};
use crate::error::UrlError;
use crate::signing::canonical::uri_encode_path;
use crate::signing::HostDescriptor;
use crate::types::{ListAllMyBucketsResult, ObjectSummary};
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Shape of an S3 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    /// `ListBucketResult`: the objects of one bucket.
    ObjectListing,
    /// `ListAllMyBucketsResult`: the buckets of the account.
    BucketListing,
    /// Object bytes.
    RawContent,
}

/// Classify a request by its host and path.
pub fn classify(host: &HostDescriptor, path: &str) -> ResponseShape {
    let at_root = path == "/" || path.is_empty();

    if (at_root && host.bucket().is_some())
        || (host.bucket().is_none() && bucket_from_path(path).is_some())
    {
        ResponseShape::ObjectListing
    } else if at_root && host.bucket().is_none() {
        ResponseShape::BucketListing
    } else {
        ResponseShape::RawContent
    }
}

/// Bucket named by a path-style path of exactly one segment.
///
/// `/photos` yields `photos`; `/`, `/photos/` and `/photos/1.jpg` yield
/// nothing.
pub fn bucket_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() || rest.contains('/') {
        None
    } else {
        Some(rest)
    }
}

/// URL of a child entry of the listing at `listing_url`.
///
/// The listing's query and fragment are dropped and `name` is appended as
/// one more path component, encoded with the S3 path rules.
///
/// URL paths resolve `.` and `..` segments, even percent-encoded ones, so a
/// name with such a segment has no URL of its own and is rejected.
pub fn child_url(listing_url: &Url, name: &str) -> Result<Url, UrlError> {
    if name.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(UrlError::UnaddressableKey {
            key: name.to_string(),
        });
    }

    let base = listing_url.path().trim_end_matches('/');
    let mut url = listing_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.set_path(&format!("{}/{}", base, uri_encode_path(name)));
    Ok(url)
}

fn child_contents(
    listing_url: &Url,
    name: &str,
    fetcher: &Arc<dyn ResourceFetcher>,
) -> LazyContents {
    match child_url(listing_url, name) {
        Ok(url) => LazyContents::new(url, fetcher.clone()),
        Err(error) => {
            warn!(%error, "Listing entry has no URL, its contents will not load");
            LazyContents::unaddressable(error, fetcher.clone())
        }
    }
}

/// Shape the objects of one or more listing pages into a table.
pub fn shape_object_listing<'a, I>(
    objects: I,
    listing_url: &Url,
    fetcher: Arc<dyn ResourceFetcher>,
) -> NavigationTable
where
    I: IntoIterator<Item = &'a ObjectSummary>,
{
    let mut builder = NavigationTableBuilder::new(TableKind::Objects);
    builder.extend(objects.into_iter().map(|object| S3Entry {
        name: object.key.clone(),
        last_modified: object.last_modified,
        e_tag: object.e_tag.clone(),
        size: object.size,
        storage_class: object.storage_class.clone(),
        contents: child_contents(listing_url, &object.key, &fetcher),
    }));
    builder.build()
}

/// Shape an account's bucket list into a table.
pub fn shape_bucket_listing(
    result: &ListAllMyBucketsResult,
    listing_url: &Url,
    fetcher: Arc<dyn ResourceFetcher>,
) -> NavigationTable {
    let mut builder = NavigationTableBuilder::new(TableKind::Buckets);
    builder.extend(result.buckets.iter().map(|bucket| {
        S3Entry::new(
            bucket.name.clone(),
            child_contents(listing_url, &bucket.name, &fetcher),
        )
    }));
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::S3Error;
    use crate::navigation::Resource;
    use crate::types::BucketSummary;
    use async_trait::async_trait;
    use test_case::test_case;

    struct NoopFetcher;

    #[async_trait]
    impl ResourceFetcher for NoopFetcher {
        async fn fetch_resource(&self, _url: &Url) -> Result<Resource, S3Error> {
            Ok(Resource::RawContent(bytes::Bytes::new()))
        }
    }

    fn host(name: &str) -> HostDescriptor {
        HostDescriptor::parse(name).unwrap()
    }

    #[test_case("mybucket.s3.amazonaws.com", "/", ResponseShape::ObjectListing ; "virtual hosted root")]
    #[test_case("s3.amazonaws.com", "/mybucket", ResponseShape::ObjectListing ; "path style bucket")]
    #[test_case("s3-eu-west-1.amazonaws.com", "/mybucket", ResponseShape::ObjectListing ; "path style dashed region")]
    #[test_case("s3.amazonaws.com", "/", ResponseShape::BucketListing ; "service root")]
    #[test_case("s3.eu-west-1.amazonaws.com", "/", ResponseShape::BucketListing ; "regional service root")]
    #[test_case("mybucket.s3.amazonaws.com", "/photos/1.jpg", ResponseShape::RawContent ; "virtual hosted object")]
    #[test_case("mybucket.s3.amazonaws.com", "/readme", ResponseShape::RawContent ; "virtual hosted single segment")]
    #[test_case("s3.amazonaws.com", "/mybucket/readme", ResponseShape::RawContent ; "path style object")]
    #[test_case("s3.amazonaws.com", "/mybucket/", ResponseShape::RawContent ; "path style trailing slash")]
    fn test_classify(host_name: &str, path: &str, expected: ResponseShape) {
        assert_eq!(classify(&host(host_name), path), expected);
    }

    #[test]
    fn test_bucket_from_path() {
        assert_eq!(bucket_from_path("/photos"), Some("photos"));
        assert_eq!(bucket_from_path("/"), None);
        assert_eq!(bucket_from_path("/photos/"), None);
        assert_eq!(bucket_from_path("/photos/1.jpg"), None);
        assert_eq!(bucket_from_path("photos"), None);
    }

    #[test_case("https://bucket.s3.amazonaws.com/", "a.txt", "https://bucket.s3.amazonaws.com/a.txt" ; "virtual hosted")]
    #[test_case("https://s3.amazonaws.com/bucket", "dir/a.txt", "https://s3.amazonaws.com/bucket/dir/a.txt" ; "path style")]
    #[test_case("https://s3.amazonaws.com/bucket?prefix=dir%2F&max-keys=5", "dir/a.txt", "https://s3.amazonaws.com/bucket/dir/a.txt" ; "query dropped")]
    #[test_case("https://s3.amazonaws.com/", "alpha", "https://s3.amazonaws.com/alpha" ; "bucket from service root")]
    #[test_case("https://bucket.s3.amazonaws.com/", "my file+1.txt", "https://bucket.s3.amazonaws.com/my%20file%2B1.txt" ; "key encoded")]
    #[test_case("https://bucket.s3.amazonaws.com/", "a/%2e%2e/b", "https://bucket.s3.amazonaws.com/a/%252e%252e/b" ; "literal percent dots kept")]
    fn test_child_url(listing: &str, name: &str, expected: &str) {
        let url = child_url(&Url::parse(listing).unwrap(), name).unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test_case("a/../secret.txt" ; "parent segment")]
    #[test_case(".." ; "parent only")]
    #[test_case("./a.txt" ; "current segment")]
    #[test_case("dir/." ; "trailing current segment")]
    fn test_child_url_rejects_dot_segments(name: &str) {
        let listing = Url::parse("https://b.s3.amazonaws.com/").unwrap();
        assert_eq!(
            child_url(&listing, name),
            Err(UrlError::UnaddressableKey {
                key: name.to_string()
            })
        );
    }

    #[test_case("a/..b/c.txt" ; "dots inside segment")]
    #[test_case("..." ; "three dots")]
    #[test_case(".hidden" ; "leading dot")]
    fn test_child_url_allows_dotted_names(name: &str) {
        let listing = Url::parse("https://b.s3.amazonaws.com/").unwrap();
        let url = child_url(&listing, name).unwrap();
        assert_eq!(url.path(), format!("/{}", name));
    }

    #[test]
    fn test_child_url_of_bucket_is_object_listing() {
        let child = child_url(&Url::parse("https://s3.amazonaws.com/").unwrap(), "alpha").unwrap();
        let shape = classify(&host(child.host_str().unwrap()), child.path());
        assert_eq!(shape, ResponseShape::ObjectListing);
    }

    #[test]
    fn test_shape_object_listing() {
        let objects = vec![
            ObjectSummary {
                key: "b.txt".to_string(),
                last_modified: None,
                e_tag: Some("\"e\"".to_string()),
                size: Some(10),
                storage_class: None,
            },
            ObjectSummary {
                key: "a.txt".to_string(),
                last_modified: None,
                e_tag: None,
                size: Some(5),
                storage_class: None,
            },
        ];
        let listing = Url::parse("https://bucket.s3.amazonaws.com/").unwrap();
        let table = shape_object_listing(&objects, &listing, Arc::new(NoopFetcher));

        assert_eq!(table.kind(), TableKind::Objects);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["a.txt", "b.txt"]);

        let b = table.get("b.txt").unwrap();
        assert_eq!(b.size, Some(10));
        assert_eq!(b.e_tag.as_deref(), Some("\"e\""));
        assert_eq!(
            b.contents.url().unwrap().as_str(),
            "https://bucket.s3.amazonaws.com/b.txt"
        );
    }

    #[tokio::test]
    async fn test_shape_object_listing_dot_segment_key_does_not_alias() {
        let objects = vec![
            ObjectSummary {
                key: "a/../secret.txt".to_string(),
                last_modified: None,
                e_tag: None,
                size: Some(1),
                storage_class: None,
            },
            ObjectSummary {
                key: "secret.txt".to_string(),
                last_modified: None,
                e_tag: None,
                size: Some(2),
                storage_class: None,
            },
        ];
        let listing = Url::parse("https://b.s3.amazonaws.com/").unwrap();
        let table = shape_object_listing(&objects, &listing, Arc::new(NoopFetcher));

        assert_eq!(table.len(), 2);
        let dotted = table.get("a/../secret.txt").unwrap();
        assert!(dotted.contents.url().is_none());
        assert_ne!(dotted.contents, table.get("secret.txt").unwrap().contents);
        assert!(matches!(
            dotted.contents.load().await,
            Err(S3Error::UnrecognizedUrl(UrlError::UnaddressableKey { .. }))
        ));
    }

    #[test]
    fn test_shape_bucket_listing_distinct_contents() {
        let result = ListAllMyBucketsResult {
            owner: None,
            buckets: vec![
                BucketSummary {
                    name: "alpha".to_string(),
                    creation_date: None,
                },
                BucketSummary {
                    name: "beta".to_string(),
                    creation_date: None,
                },
            ],
        };
        let listing = Url::parse("https://s3.amazonaws.com/").unwrap();
        let table = shape_bucket_listing(&result, &listing, Arc::new(NoopFetcher));

        assert_eq!(table.kind(), TableKind::Buckets);
        assert_eq!(table.len(), 2);
        assert_ne!(
            table.get("alpha").unwrap().contents,
            table.get("beta").unwrap().contents
        );
    }
}
