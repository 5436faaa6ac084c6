//! XML parsing utilities for S3 responses.
//!
//! Only the two listing documents a `GET` can return are understood. Each
//! parser checks the document root first, so an `<Error>` body or an
//! unrelated document is reported as a shape mismatch instead of being read
//! as an empty listing.
//!
//! Text is read verbatim: object keys and bucket names may begin or end with
//! whitespace. Whitespace between elements arrives while no field element is
//! open and is dropped by the per-element `match`. Scalar fields are trimmed
//! before they are parsed.

use crate::error::{S3Error, ShapeError};
use crate::types::*;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Root element of an object listing.
pub const LIST_BUCKET_RESULT: &str = "ListBucketResult";

/// Root element of a bucket listing.
pub const LIST_ALL_MY_BUCKETS_RESULT: &str = "ListAllMyBucketsResult";

/// Parse a ListObjects response.
pub fn parse_list_bucket_result(xml: &str) -> Result<ListBucketResult, S3Error> {
    let mut reader = Reader::from_str(xml);

    let mut output = ListBucketResult::default();
    let mut root: Option<String> = None;

    let mut current_object: Option<PartialObject> = None;
    let mut in_owner = false;
    let mut in_common_prefixes = false;
    let mut current_element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if root.is_none() {
                    expect_root(&name, LIST_BUCKET_RESULT)?;
                    root = Some(name);
                    continue;
                }

                match name.as_str() {
                    "Contents" => current_object = Some(PartialObject::default()),
                    "Owner" if current_object.is_some() => in_owner = true,
                    "CommonPrefixes" => in_common_prefixes = true,
                    _ => {}
                }
                current_element = name;
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if root.is_none() {
                    expect_root(&name, LIST_BUCKET_RESULT)?;
                    root = Some(name);
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(xml_error)?.into_owned();

                if in_common_prefixes || in_owner {
                    continue;
                }
                if let Some(obj) = current_object.as_mut() {
                    match current_element.as_str() {
                        "Key" => obj.key = Some(text),
                        "LastModified" => obj.last_modified = Some(parse_timestamp("LastModified", &text)?),
                        "ETag" => obj.e_tag = Some(text.trim().to_string()),
                        "Size" => obj.size = Some(parse_number("Size", &text)?),
                        "StorageClass" => obj.storage_class = Some(StorageClass::from(text.trim())),
                        _ => {}
                    }
                } else {
                    match current_element.as_str() {
                        "Name" => output.name = Some(text),
                        "Prefix" => output.prefix = Some(text),
                        "Marker" => output.marker = Some(text),
                        "NextMarker" => output.next_marker = Some(text),
                        "MaxKeys" => output.max_keys = Some(parse_number("MaxKeys", &text)?),
                        "IsTruncated" => output.is_truncated = parse_bool("IsTruncated", &text)?,
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"Contents" => {
                        if let Some(obj) = current_object.take() {
                            output.contents.push(obj.finish()?);
                        }
                    }
                    b"Owner" => in_owner = false,
                    b"CommonPrefixes" => in_common_prefixes = false,
                    _ => {}
                }
                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    if root.is_none() {
        expect_root("", LIST_BUCKET_RESULT)?;
    }
    Ok(output)
}

/// Parse a ListBuckets response.
pub fn parse_list_all_my_buckets(xml: &str) -> Result<ListAllMyBucketsResult, S3Error> {
    let mut reader = Reader::from_str(xml);

    let mut output = ListAllMyBucketsResult::default();
    let mut root: Option<String> = None;

    let mut current_bucket: Option<(Option<String>, Option<DateTime<Utc>>)> = None;
    let mut current_owner: Option<Owner> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if root.is_none() {
                    expect_root(&name, LIST_ALL_MY_BUCKETS_RESULT)?;
                    root = Some(name);
                    continue;
                }

                match name.as_str() {
                    "Bucket" => current_bucket = Some((None, None)),
                    "Owner" => current_owner = Some(Owner::default()),
                    _ => {}
                }
                current_element = name;
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if root.is_none() {
                    expect_root(&name, LIST_ALL_MY_BUCKETS_RESULT)?;
                    root = Some(name);
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(xml_error)?.into_owned();

                if let Some((name, creation_date)) = current_bucket.as_mut() {
                    match current_element.as_str() {
                        "Name" => *name = Some(text),
                        "CreationDate" => {
                            *creation_date = Some(parse_timestamp("CreationDate", &text)?)
                        }
                        _ => {}
                    }
                } else if let Some(owner) = current_owner.as_mut() {
                    match current_element.as_str() {
                        "ID" => owner.id = Some(text.trim().to_string()),
                        "DisplayName" => owner.display_name = Some(text.trim().to_string()),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"Bucket" => {
                        if let Some((name, creation_date)) = current_bucket.take() {
                            let name = name.ok_or_else(|| missing("Bucket/Name"))?;
                            output.buckets.push(BucketSummary {
                                name,
                                creation_date,
                            });
                        }
                    }
                    b"Owner" => output.owner = current_owner.take(),
                    _ => {}
                }
                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    if root.is_none() {
        expect_root("", LIST_ALL_MY_BUCKETS_RESULT)?;
    }
    Ok(output)
}

#[derive(Default)]
struct PartialObject {
    key: Option<String>,
    last_modified: Option<DateTime<Utc>>,
    e_tag: Option<String>,
    size: Option<u64>,
    storage_class: Option<StorageClass>,
}

impl PartialObject {
    fn finish(self) -> Result<ObjectSummary, S3Error> {
        Ok(ObjectSummary {
            key: self.key.ok_or_else(|| missing("Contents/Key"))?,
            last_modified: self.last_modified,
            e_tag: self.e_tag,
            size: self.size,
            storage_class: self.storage_class,
        })
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn expect_root(actual: &str, expected: &str) -> Result<(), S3Error> {
    if actual == expected {
        return Ok(());
    }
    Err(S3Error::ShapeMismatch(ShapeError::UnexpectedRoot {
        expected: expected.to_string(),
        actual: actual.to_string(),
    }))
}

fn xml_error(e: impl std::fmt::Display) -> S3Error {
    S3Error::ShapeMismatch(ShapeError::XmlParse {
        message: e.to_string(),
    })
}

fn missing(element: &str) -> S3Error {
    S3Error::ShapeMismatch(ShapeError::MissingElement {
        element: element.to_string(),
    })
}

fn invalid(field: &str, value: &str) -> S3Error {
    S3Error::ShapeMismatch(ShapeError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_timestamp(field: &str, text: &str) -> Result<DateTime<Utc>, S3Error> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid(field, text))
}

fn parse_number<T: std::str::FromStr>(field: &str, text: &str) -> Result<T, S3Error> {
    text.trim().parse().map_err(|_| invalid(field, text))
}

fn parse_bool(field: &str, text: &str) -> Result<bool, S3Error> {
    match text.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(invalid(field, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_list_bucket_result() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
            <Name>mybucket</Name>
            <Prefix>photos/</Prefix>
            <Marker></Marker>
            <MaxKeys>1000</MaxKeys>
            <IsTruncated>false</IsTruncated>
            <Contents>
                <Key>photos/1.jpg</Key>
                <LastModified>2023-01-01T00:00:00.000Z</LastModified>
                <ETag>&quot;abc123&quot;</ETag>
                <Size>1024</Size>
                <Owner>
                    <ID>owner-id</ID>
                    <DisplayName>someone</DisplayName>
                </Owner>
                <StorageClass>STANDARD</StorageClass>
            </Contents>
            <Contents>
                <Key>photos/2.jpg</Key>
                <Size>0</Size>
                <StorageClass>GLACIER</StorageClass>
            </Contents>
        </ListBucketResult>"#;

        let result = parse_list_bucket_result(xml).unwrap();
        assert_eq!(result.name, Some("mybucket".to_string()));
        assert_eq!(result.prefix, Some("photos/".to_string()));
        assert_eq!(result.max_keys, Some(1000));
        assert!(!result.is_truncated);
        assert_eq!(result.contents.len(), 2);

        let first = &result.contents[0];
        assert_eq!(first.key, "photos/1.jpg");
        assert_eq!(first.size, Some(1024));
        assert_eq!(first.e_tag, Some("\"abc123\"".to_string()));
        assert_eq!(first.storage_class, Some(StorageClass::Standard));
        assert_eq!(
            first.last_modified,
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );

        let second = &result.contents[1];
        assert_eq!(second.key, "photos/2.jpg");
        assert_eq!(second.size, Some(0));
        assert!(second.last_modified.is_none());
        assert_eq!(second.storage_class, Some(StorageClass::Glacier));
    }

    #[test]
    fn test_parse_list_bucket_result_truncated() {
        let xml = r#"<ListBucketResult>
            <Name>mybucket</Name>
            <IsTruncated>true</IsTruncated>
            <NextMarker>b</NextMarker>
            <Contents><Key>a</Key></Contents>
        </ListBucketResult>"#;

        let result = parse_list_bucket_result(xml).unwrap();
        assert!(result.is_truncated);
        assert_eq!(result.next_marker, Some("b".to_string()));
        assert_eq!(result.continuation_marker(), Some("b"));
    }

    #[test]
    fn test_parse_list_bucket_result_ignores_common_prefixes() {
        let xml = r#"<ListBucketResult>
            <Prefix></Prefix>
            <Contents><Key>top.txt</Key></Contents>
            <CommonPrefixes><Prefix>photos/</Prefix></CommonPrefixes>
        </ListBucketResult>"#;

        let result = parse_list_bucket_result(xml).unwrap();
        assert!(result.prefix.is_none());
        assert_eq!(result.contents.len(), 1);
    }

    #[test]
    fn test_parse_list_bucket_result_empty_listing() {
        let xml = r#"<ListBucketResult><Name>empty</Name><IsTruncated>false</IsTruncated></ListBucketResult>"#;
        let result = parse_list_bucket_result(xml).unwrap();
        assert!(result.contents.is_empty());
    }

    #[test]
    fn test_parse_list_bucket_result_missing_key() {
        let xml = r#"<ListBucketResult><Contents><Size>3</Size></Contents></ListBucketResult>"#;
        let result = parse_list_bucket_result(xml);
        assert!(matches!(
            result,
            Err(S3Error::ShapeMismatch(ShapeError::MissingElement { .. }))
        ));
    }

    #[test]
    fn test_parse_list_bucket_result_invalid_size() {
        let xml = r#"<ListBucketResult><Contents><Key>k</Key><Size>big</Size></Contents></ListBucketResult>"#;
        match parse_list_bucket_result(xml) {
            Err(S3Error::ShapeMismatch(ShapeError::InvalidField { field, value })) => {
                assert_eq!(field, "Size");
                assert_eq!(value, "big");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_bucket_result_invalid_timestamp() {
        let xml = r#"<ListBucketResult><Contents><Key>k</Key><LastModified>yesterday</LastModified></Contents></ListBucketResult>"#;
        assert!(matches!(
            parse_list_bucket_result(xml),
            Err(S3Error::ShapeMismatch(ShapeError::InvalidField { .. }))
        ));
    }

    #[test]
    fn test_parse_list_bucket_result_rejects_error_document() {
        let xml = r#"<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>"#;
        match parse_list_bucket_result(xml) {
            Err(S3Error::ShapeMismatch(ShapeError::UnexpectedRoot { expected, actual })) => {
                assert_eq!(expected, "ListBucketResult");
                assert_eq!(actual, "Error");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_bucket_result_rejects_empty_body() {
        assert!(matches!(
            parse_list_bucket_result(""),
            Err(S3Error::ShapeMismatch(ShapeError::UnexpectedRoot { .. }))
        ));
    }

    #[test]
    fn test_parse_list_bucket_result_malformed() {
        let xml = r#"<ListBucketResult><Contents><Key>k</Contents></ListBucketResult>"#;
        assert!(matches!(
            parse_list_bucket_result(xml),
            Err(S3Error::ShapeMismatch(ShapeError::XmlParse { .. }))
        ));
    }

    #[test]
    fn test_parse_list_bucket_result_keeps_key_whitespace() {
        let xml = r#"<ListBucketResult>
            <Name>b</Name>
            <Prefix> </Prefix>
            <Contents>
                <Key>notes.txt </Key>
                <Size> 4 </Size>
            </Contents>
            <Contents>
                <Key> notes.txt</Key>
            </Contents>
            <Contents>
                <Key> </Key>
            </Contents>
        </ListBucketResult>"#;

        let result = parse_list_bucket_result(xml).unwrap();
        let keys: Vec<&str> = result.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["notes.txt ", " notes.txt", " "]);
        assert_eq!(result.contents[0].size, Some(4));
        assert_eq!(result.prefix, Some(" ".to_string()));
        assert_eq!(result.name, Some("b".to_string()));
    }

    #[test]
    fn test_parse_list_bucket_result_marker_verbatim() {
        let xml = r#"<ListBucketResult>
            <IsTruncated> true </IsTruncated>
            <Contents><Key>a </Key></Contents>
        </ListBucketResult>"#;

        let result = parse_list_bucket_result(xml).unwrap();
        assert!(result.is_truncated);
        assert_eq!(result.continuation_marker(), Some("a "));
    }

    #[test]
    fn test_parse_list_all_my_buckets() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
            <Owner>
                <ID>owner-id</ID>
                <DisplayName>someone</DisplayName>
            </Owner>
            <Buckets>
                <Bucket>
                    <Name>alpha</Name>
                    <CreationDate>2019-12-11T23:32:47+00:00</CreationDate>
                </Bucket>
                <Bucket>
                    <Name>beta</Name>
                </Bucket>
            </Buckets>
        </ListAllMyBucketsResult>"#;

        let result = parse_list_all_my_buckets(xml).unwrap();
        let owner = result.owner.unwrap();
        assert_eq!(owner.id, Some("owner-id".to_string()));
        assert_eq!(owner.display_name, Some("someone".to_string()));

        assert_eq!(result.buckets.len(), 2);
        assert_eq!(result.buckets[0].name, "alpha");
        assert_eq!(
            result.buckets[0].creation_date,
            Some(Utc.with_ymd_and_hms(2019, 12, 11, 23, 32, 47).unwrap())
        );
        assert_eq!(result.buckets[1].name, "beta");
        assert!(result.buckets[1].creation_date.is_none());
    }

    #[test]
    fn test_parse_list_all_my_buckets_missing_name() {
        let xml = r#"<ListAllMyBucketsResult><Buckets><Bucket><CreationDate>2019-12-11T23:32:47Z</CreationDate></Bucket></Buckets></ListAllMyBucketsResult>"#;
        match parse_list_all_my_buckets(xml) {
            Err(S3Error::ShapeMismatch(ShapeError::MissingElement { element })) => {
                assert_eq!(element, "Bucket/Name");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_all_my_buckets_rejects_object_listing() {
        let xml = r#"<ListBucketResult><Name>b</Name></ListBucketResult>"#;
        assert!(matches!(
            parse_list_all_my_buckets(xml),
            Err(S3Error::ShapeMismatch(ShapeError::UnexpectedRoot { .. }))
        ));
    }

    #[test]
    fn test_parse_list_all_my_buckets_keeps_name_verbatim() {
        let xml = r#"<ListAllMyBucketsResult>
            <Buckets>
                <Bucket><Name>alpha</Name></Bucket>
                <Bucket><Name> alpha</Name></Bucket>
            </Buckets>
        </ListAllMyBucketsResult>"#;

        let result = parse_list_all_my_buckets(xml).unwrap();
        let names: Vec<&str> = result.buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", " alpha"]);
    }

    #[test]
    fn test_parse_list_all_my_buckets_self_closing_root() {
        let result = parse_list_all_my_buckets("<ListAllMyBucketsResult/>").unwrap();
        assert!(result.buckets.is_empty());
    }
}
