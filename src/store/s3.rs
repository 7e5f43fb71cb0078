//! S3互換ストアのクライアント
//!
//! PutObject と ListObjectsV2 のみを扱う。

use super::sigv4::{self, CanonicalRequest};
use super::{BlobStore, ObjectPage};
use crate::config::{HttpConfig, StoreConfig};
use crate::error::{PublishError, Result};
use crate::http::with_retry;
use regex::Regex;
use reqwest::{Client, Method};
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<Key>(.*?)</Key>").expect("valid key pattern"));
static TRUNCATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<IsTruncated>\s*(true|false)\s*</IsTruncated>").expect("valid truncation pattern")
});
static CONTINUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<NextContinuationToken>(.*?)</NextContinuationToken>")
        .expect("valid continuation pattern")
});
static MESSAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<Message>(.*?)</Message>").expect("valid message pattern"));

/// S3互換ストア
pub struct S3Store {
    client: Client,
    config: StoreConfig,
    scheme: String,
    endpoint_host: String,
    max_retries: u32,
}

impl S3Store {
    pub fn new(config: StoreConfig, http: &HttpConfig) -> Self {
        let (scheme, endpoint_host) = split_endpoint(&config.endpoint);
        Self {
            client: http.build_client(),
            scheme,
            endpoint_host,
            config,
            max_retries: http.max_retries,
        }
    }

    /// リクエスト先のホスト
    pub fn host(&self) -> String {
        if self.config.force_path_style {
            self.endpoint_host.clone()
        } else {
            format!("{}.{}", self.config.bucket, self.endpoint_host)
        }
    }

    /// オブジェクトのパス（エンコード済み）
    pub fn object_path(&self, key: &str) -> String {
        let key = sigv4::uri_encode(key, false);
        if self.config.force_path_style {
            format!("/{}/{}", sigv4::uri_encode(&self.config.bucket, true), key)
        } else {
            format!("/{}", key)
        }
    }

    /// バケットのパス
    pub fn bucket_path(&self) -> String {
        if self.config.force_path_style {
            format!("/{}", sigv4::uri_encode(&self.config.bucket, true))
        } else {
            "/".to_string()
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<String> {
        let host = self.host();
        let payload_hash = sigv4::sha256_hex(&body);
        let request = CanonicalRequest {
            method: method.as_str(),
            host: &host,
            uri: path,
            query,
            payload_hash: &payload_hash,
        };
        let signed = sigv4::sign(
            &request,
            &self.config.credentials,
            &self.config.region,
            chrono::Utc::now(),
        )?;

        let mut url = format!("{}://{}{}", self.scheme, host, path);
        let canonical_query = request.canonical_query();
        if !canonical_query.is_empty() {
            url.push('?');
            url.push_str(&canonical_query);
        }

        let response = self
            .client
            .request(method, &url)
            .header("x-amz-date", signed.amz_date.as_str())
            .header("x-amz-content-sha256", signed.content_sha256.as_str())
            .header("authorization", signed.authorization.as_str())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(PublishError::BlobStore {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(text)
    }
}

impl BlobStore for S3Store {
    fn put_object<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.object_path(key);
            tracing::debug!(key, bytes = body.len(), "uploading object");
            with_retry(
                || self.send(Method::PUT, &path, &[], body.clone()),
                self.max_retries,
            )
            .await?;
            Ok(())
        })
    }

    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
        continuation: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<ObjectPage>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.bucket_path();
            let mut query = vec![("list-type", "2"), ("prefix", prefix)];
            if let Some(token) = continuation {
                query.push(("continuation-token", token));
            }

            let xml = with_retry(
                || self.send(Method::GET, &path, &query, Vec::new()),
                self.max_retries,
            )
            .await?;
            parse_list_response(&xml)
        })
    }
}

/// `https://host` → (`https`, `host`)
fn split_endpoint(endpoint: &str) -> (String, String) {
    let trimmed = endpoint.trim_end_matches('/');
    match trimmed.split_once("://") {
        Some((scheme, host)) => (scheme.to_string(), host.to_string()),
        None => ("https".to_string(), trimmed.to_string()),
    }
}

/// ListObjectsV2 のレスポンスをパース
pub fn parse_list_response(xml: &str) -> Result<ObjectPage> {
    if !xml.contains("<ListBucketResult") {
        return Err(PublishError::BlobStore {
            status: 200,
            message: "response is not a ListBucketResult document".to_string(),
        });
    }

    let keys = KEY_RE
        .captures_iter(xml)
        .map(|caps| unescape_xml(&caps[1]))
        .collect();

    let truncated = TRUNCATED_RE
        .captures(xml)
        .is_some_and(|caps| &caps[1] == "true");

    let next_continuation = if truncated {
        let token = CONTINUATION_RE
            .captures(xml)
            .map(|caps| unescape_xml(&caps[1]))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| PublishError::BlobStore {
                status: 200,
                message: "truncated listing without NextContinuationToken".to_string(),
            })?;
        Some(token)
    } else {
        None
    };

    Ok(ObjectPage {
        keys,
        next_continuation,
    })
}

/// エラーレスポンスから `<Message>` を取り出す
fn error_message(body: &str) -> String {
    MESSAGE_RE
        .captures(body)
        .map(|caps| unescape_xml(&caps[1]))
        .unwrap_or_else(|| body.trim().to_string())
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "s3_test.rs"]
mod tests;
