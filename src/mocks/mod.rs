//! Mock implementations for testing.
//!
//! This module provides mock implementations of the navigator's
//! collaborators, plus canned S3 response bodies.

mod credentials;
mod transport;

pub use credentials::MockCredentialsProvider;
pub use transport::{MockResponse, MockResponseBuilder, MockTransport};

/// Test fixtures for S3 responses.
pub struct TestFixtures;

impl TestFixtures {
    /// ListObjects response for `test-bucket` with two objects.
    pub fn list_objects_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Name>test-bucket</Name>
    <Prefix></Prefix>
    <Marker></Marker>
    <MaxKeys>1000</MaxKeys>
    <IsTruncated>false</IsTruncated>
    <Contents>
        <Key>file1.txt</Key>
        <LastModified>2024-01-15T10:30:00.000Z</LastModified>
        <ETag>"abc123"</ETag>
        <Size>1024</Size>
        <StorageClass>STANDARD</StorageClass>
    </Contents>
    <Contents>
        <Key>docs/file2.txt</Key>
        <LastModified>2024-01-16T11:30:00.000Z</LastModified>
        <ETag>"def456"</ETag>
        <Size>2048</Size>
        <StorageClass>STANDARD_IA</StorageClass>
    </Contents>
</ListBucketResult>"#
    }

    /// One page of a truncated ListObjects response.
    ///
    /// `next_marker` is emitted as `<NextMarker>` when given; otherwise the
    /// page relies on its last key as the marker.
    pub fn list_objects_page_xml(keys: &[&str], truncated: bool, next_marker: Option<&str>) -> String {
        let contents: String = keys
            .iter()
            .map(|key| {
                format!(
                    "<Contents><Key>{}</Key><Size>1</Size><StorageClass>STANDARD</StorageClass></Contents>",
                    key
                )
            })
            .collect();
        let next_marker = next_marker
            .map(|marker| format!("<NextMarker>{}</NextMarker>", marker))
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>test-bucket</Name><IsTruncated>{}</IsTruncated>{}{}</ListBucketResult>"#,
            truncated, next_marker, contents
        )
    }

    /// ListBuckets response with two buckets.
    pub fn list_buckets_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Owner>
        <ID>owner-id</ID>
        <DisplayName>Owner Name</DisplayName>
    </Owner>
    <Buckets>
        <Bucket>
            <Name>bucket1</Name>
            <CreationDate>2024-01-01T00:00:00.000Z</CreationDate>
        </Bucket>
        <Bucket>
            <Name>bucket2</Name>
            <CreationDate>2024-01-02T00:00:00.000Z</CreationDate>
        </Bucket>
    </Buckets>
</ListAllMyBucketsResult>"#
    }

    /// S3 error document.
    pub fn error_xml(code: &str, message: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>{}</Code>
    <Message>{}</Message>
    <RequestId>test-request-id</RequestId>
</Error>"#,
            code, message
        )
    }
}
