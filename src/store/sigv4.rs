//! AWS Signature Version 4（S3 向け）
//!
//! 署名対象ヘッダーは `host`, `x-amz-content-sha256`, `x-amz-date` の3つに固定する。

use crate::error::{PublishError, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const TERMINATOR: &str = "aws4_request";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// アクセスキー
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// 署名対象のリクエスト
#[derive(Debug, Clone)]
pub struct CanonicalRequest<'a> {
    pub method: &'a str,
    pub host: &'a str,
    /// エンコード済みのパス
    pub uri: &'a str,
    /// エンコード前のクエリパラメータ
    pub query: &'a [(&'a str, &'a str)],
    pub payload_hash: &'a str,
}

/// リクエストに付与するヘッダー値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

/// 16進 SHA-256
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// RFC 3986 の非予約文字以外をパーセントエンコード
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

impl CanonicalRequest<'_> {
    /// キー順に並べたクエリ文字列
    pub fn canonical_query(&self) -> String {
        let mut pairs: Vec<(String, String)> = self
            .query
            .iter()
            .map(|(k, v)| (uri_encode(k, true), uri_encode(v, true)))
            .collect();
        pairs.sort();

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn canonical_string(&self, amz_date: &str) -> String {
        format!(
            "{}\n{}\n{}\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
            self.method,
            self.uri,
            self.canonical_query(),
            self.host,
            self.payload_hash,
            amz_date,
            SIGNED_HEADERS,
            self.payload_hash,
        )
    }
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| PublishError::Signing(format!("failed to create HMAC instance: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// 日付・リージョンから署名鍵を導出
fn signing_key(secret_key: &str, date: &str, region: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date)?;
    let k_region = hmac_sha256(&k_date, region)?;
    let k_service = hmac_sha256(&k_region, SERVICE)?;
    hmac_sha256(&k_service, TERMINATOR)
}

/// リクエストに署名する
pub fn sign(
    request: &CanonicalRequest<'_>,
    credentials: &Credentials,
    region: &str,
    now: DateTime<Utc>,
) -> Result<SignedHeaders> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let scope = format!("{}/{}/{}/{}", date, region, SERVICE, TERMINATOR);

    let canonical = request.canonical_string(&amz_date);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        sha256_hex(canonical.as_bytes())
    );

    let key = signing_key(&credentials.secret_key, &date, region)?;
    let signature = hex::encode(hmac_sha256(&key, &string_to_sign)?);

    Ok(SignedHeaders {
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, credentials.access_key, scope, SIGNED_HEADERS, signature
        ),
        amz_date,
        content_sha256: request.payload_hash.to_string(),
    })
}

#[cfg(test)]
#[path = "sigv4_test.rs"]
mod tests;
