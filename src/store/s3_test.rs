use super::*;
use crate::store::sigv4::Credentials;

fn store_config(force_path_style: bool) -> StoreConfig {
    StoreConfig {
        credentials: Credentials {
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
        },
        bucket: "zed-extensions".to_string(),
        endpoint: "https://nyc3.digitaloceanspaces.com/".to_string(),
        region: "nyc3".to_string(),
        force_path_style,
    }
}

#[test]
fn test_virtual_hosted_style() {
    let store = S3Store::new(store_config(false), &HttpConfig::default());
    assert_eq!(store.host(), "zed-extensions.nyc3.digitaloceanspaces.com");
    assert_eq!(
        store.object_path("extensions/a b/1.0.0/archive.tar.gz"),
        "/extensions/a%20b/1.0.0/archive.tar.gz"
    );
    assert_eq!(store.bucket_path(), "/");
}

#[test]
fn test_path_style() {
    let store = S3Store::new(store_config(true), &HttpConfig::default());
    assert_eq!(store.host(), "nyc3.digitaloceanspaces.com");
    assert_eq!(
        store.object_path("extensions/a/1.0.0/manifest.json"),
        "/zed-extensions/extensions/a/1.0.0/manifest.json"
    );
    assert_eq!(store.bucket_path(), "/zed-extensions");
}

#[test]
fn test_split_endpoint() {
    assert_eq!(
        split_endpoint("http://localhost:9000"),
        ("http".to_string(), "localhost:9000".to_string())
    );
    assert_eq!(
        split_endpoint("storage.example.com"),
        ("https".to_string(), "storage.example.com".to_string())
    );
}

#[test]
fn test_parse_list_response_last_page() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>zed-extensions</Name>
  <Prefix>extensions/</Prefix>
  <KeyCount>2</KeyCount>
  <IsTruncated>false</IsTruncated>
  <Contents><Key>extensions/a/1.0.0/archive.tar.gz</Key><Size>10</Size></Contents>
  <Contents><Key>extensions/b&amp;c/2.0.0/manifest.json</Key><Size>3</Size></Contents>
</ListBucketResult>"#;

    let page = parse_list_response(xml).unwrap();
    assert_eq!(
        page.keys,
        vec![
            "extensions/a/1.0.0/archive.tar.gz".to_string(),
            "extensions/b&c/2.0.0/manifest.json".to_string(),
        ]
    );
    assert_eq!(page.next_continuation, None);
}

#[test]
fn test_parse_list_response_truncated() {
    let xml = "<ListBucketResult><IsTruncated>true</IsTruncated>\
               <Contents><Key>extensions/a/1.0.0/x</Key></Contents>\
               <NextContinuationToken>1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=</NextContinuationToken>\
               </ListBucketResult>";

    let page = parse_list_response(xml).unwrap();
    assert_eq!(page.keys.len(), 1);
    assert_eq!(
        page.next_continuation.as_deref(),
        Some("1ueGcxLPRx1Tr/XYExHnhbYLgveDs2J/wm36Hy4vbOwM=")
    );
}

#[test]
fn test_parse_list_response_truncated_without_token() {
    let xml = "<ListBucketResult><IsTruncated>true</IsTruncated></ListBucketResult>";
    assert!(matches!(
        parse_list_response(xml),
        Err(PublishError::BlobStore { .. })
    ));
}

#[test]
fn test_parse_list_response_empty() {
    let xml = "<ListBucketResult><KeyCount>0</KeyCount><IsTruncated>false</IsTruncated></ListBucketResult>";
    let page = parse_list_response(xml).unwrap();
    assert!(page.keys.is_empty());
}

#[test]
fn test_error_message_extracts_message() {
    let body = "<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>";
    assert_eq!(error_message(body), "Access Denied");
    assert_eq!(error_message("  plain  "), "plain");
}

#[test]
fn test_unescape_xml_amp_last() {
    assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
    assert_eq!(unescape_xml("a&lt;b&gt;&quot;&apos;"), "a<b>\"'");
}

#[test]
fn test_parse_list_response_rejects_non_listing_body() {
    for body in ["", "<html><body>502 Bad Gateway</body></html>", "OK"] {
        match parse_list_response(body) {
            Err(PublishError::BlobStore { status, message }) => {
                assert_eq!(status, 200);
                assert!(message.contains("ListBucketResult"));
            }
            other => panic!("unexpected result for {body:?}: {other:?}"),
        }
    }
}
