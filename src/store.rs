//! 拡張機能パッケージの保存先（S3互換オブジェクトストア）
//!
//! キーは `extensions/<id>/<version>/<filename>` の形式。

pub mod s3;
pub mod sigv4;

#[cfg(test)]
pub mod mock;

pub use s3::S3Store;

use crate::error::{PublishError, Result};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::pin::Pin;

/// パッケージを配置するキーの接頭辞
pub const EXTENSIONS_PREFIX: &str = "extensions";

/// オブジェクト一覧の1ページ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub keys: Vec<String>,
    /// 次ページの継続トークン（最終ページでは None）
    pub next_continuation: Option<String>,
}

/// オブジェクトストア trait
pub trait BlobStore: Send + Sync {
    /// オブジェクトを書き込む（同じキーは上書き）
    fn put_object<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// 接頭辞に一致するキーを1ページ分取得
    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
        continuation: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<ObjectPage>> + Send + 'a>>;
}

/// パース済みのオブジェクトキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey<'a> {
    pub id: &'a str,
    pub version: &'a str,
    pub file_name: Option<&'a str>,
}

/// `<prefix>/<id>/<version>/<filename>` をパース
pub fn parse_object_key(key: &str) -> Result<ObjectKey<'_>> {
    let mut parts = key.splitn(4, '/');
    let _prefix = parts.next();
    let id = parts.next().filter(|s| !s.is_empty());
    let version = parts.next().filter(|s| !s.is_empty());
    let file_name = parts.next().filter(|s| !s.is_empty());

    let id = id.ok_or_else(|| PublishError::InvalidObjectKey {
        key: key.to_string(),
        reason: "no extension ID in blob store key",
    })?;
    let version = version.ok_or_else(|| PublishError::InvalidObjectKey {
        key: key.to_string(),
        reason: "no version in blob store key",
    })?;

    Ok(ObjectKey {
        id,
        version,
        file_name,
    })
}

/// パッケージファイルのキー
pub fn object_key(id: &str, version: &str, file_name: &str) -> String {
    format!("{}/{}/{}/{}", EXTENSIONS_PREFIX, id, version, file_name)
}

/// 継続トークンがなくなるまで全ページのキーを取得
pub async fn list_all_keys(store: &dyn BlobStore, prefix: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut continuation: Option<String> = None;

    loop {
        let page = store.list_objects(prefix, continuation.as_deref()).await?;
        tracing::debug!(count = page.keys.len(), "listed blob store page");
        keys.extend(page.keys);

        match page.next_continuation {
            Some(token) => continuation = Some(token),
            None => break,
        }
    }

    Ok(keys)
}

/// 拡張ID → 公開済みバージョンの集合
pub type PublishedVersions = HashMap<String, BTreeSet<String>>;

/// ストア上の公開済みバージョンを集計
pub async fn published_versions(store: &dyn BlobStore) -> Result<PublishedVersions> {
    let prefix = format!("{}/", EXTENSIONS_PREFIX);
    let keys = list_all_keys(store, &prefix).await?;

    let mut versions = PublishedVersions::new();
    for key in &keys {
        let parsed = parse_object_key(key)?;
        versions
            .entry(parsed.id.to_string())
            .or_default()
            .insert(parsed.version.to_string());
    }

    tracing::info!(
        objects = keys.len(),
        extensions = versions.len(),
        "collected published versions"
    );
    Ok(versions)
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
