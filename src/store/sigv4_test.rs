use super::*;
use chrono::TimeZone;

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn credentials() -> Credentials {
    Credentials {
        access_key: "AKIDEXAMPLE".to_string(),
        secret_key: "secret".to_string(),
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

#[test]
fn test_sha256_hex_empty() {
    assert_eq!(sha256_hex(b""), EMPTY_SHA256);
}

#[test]
fn test_uri_encode() {
    assert_eq!(uri_encode("extensions/my-ext/1.0.0", false), "extensions/my-ext/1.0.0");
    assert_eq!(uri_encode("extensions/", true), "extensions%2F");
    assert_eq!(uri_encode("a b+c=~", true), "a%20b%2Bc%3D~");
    assert_eq!(uri_encode("é", true), "%C3%A9");
}

#[test]
fn test_canonical_query_is_sorted_and_encoded() {
    let query = [
        ("prefix", "extensions/"),
        ("list-type", "2"),
        ("continuation-token", "a+b/c="),
    ];
    let request = CanonicalRequest {
        method: "GET",
        host: "bucket.nyc3.digitaloceanspaces.com",
        uri: "/",
        query: &query,
        payload_hash: EMPTY_SHA256,
    };
    assert_eq!(
        request.canonical_query(),
        "continuation-token=a%2Bb%2Fc%3D&list-type=2&prefix=extensions%2F"
    );
}

#[test]
fn test_sign_put_object() {
    let payload_hash = sha256_hex(b"hello");
    let request = CanonicalRequest {
        method: "PUT",
        host: "bucket.nyc3.digitaloceanspaces.com",
        uri: "/extensions/my-ext/1.0.0/archive.tar.gz",
        query: &[],
        payload_hash: &payload_hash,
    };

    let signed = sign(&request, &credentials(), "nyc3", now()).unwrap();

    assert_eq!(signed.amz_date, "20240102T030405Z");
    assert_eq!(
        signed.content_sha256,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert_eq!(
        signed.authorization,
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240102/nyc3/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
         Signature=f0672630903e81147e57765b102b6a1510e12e5e3d0c4320f127c2b5251291ba"
    );
}

#[test]
fn test_sign_list_objects() {
    let query = [
        ("list-type", "2"),
        ("prefix", "extensions/"),
        ("continuation-token", "a+b/c="),
    ];
    let request = CanonicalRequest {
        method: "GET",
        host: "bucket.nyc3.digitaloceanspaces.com",
        uri: "/",
        query: &query,
        payload_hash: EMPTY_SHA256,
    };

    let signed = sign(&request, &credentials(), "nyc3", now()).unwrap();
    assert!(signed
        .authorization
        .ends_with("Signature=6ae9844879e9d0f3f08e2ef81fd60e5ceb362659dd93abbab538ceb9ff830d2a"));
}

#[test]
fn test_signature_depends_on_region() {
    let request = CanonicalRequest {
        method: "GET",
        host: "bucket.example.com",
        uri: "/",
        query: &[],
        payload_hash: EMPTY_SHA256,
    };
    let a = sign(&request, &credentials(), "nyc3", now()).unwrap();
    let b = sign(&request, &credentials(), "ams3", now()).unwrap();
    assert_ne!(a.authorization, b.authorization);
}

#[test]
fn test_credentials_debug_hides_secret() {
    let debug = format!("{:?}", credentials());
    assert!(debug.contains("AKIDEXAMPLE"));
    assert!(!debug.contains("secret\""));
}
