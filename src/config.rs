//! 実行時設定
//!
//! 環境変数は起動時に一度だけ読み込み、`Config` として各コンポーネントに渡す。

use crate::env::EnvVar;
use crate::error::Result;
use crate::store::sigv4::Credentials;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_S3_ACCESS_KEY: &str = "S3_ACCESS_KEY";
pub const ENV_S3_SECRET_KEY: &str = "S3_SECRET_KEY";
pub const ENV_S3_BUCKET: &str = "S3_BUCKET";
pub const ENV_S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const ENV_S3_REGION: &str = "S3_REGION";
pub const ENV_S3_FORCE_PATH_STYLE: &str = "S3_FORCE_PATH_STYLE";
pub const ENV_SHOULD_PUBLISH: &str = "SHOULD_PUBLISH";
pub const ENV_GITHUB_REF_NAME: &str = "GITHUB_REF_NAME";
pub const ENV_EXTENSION_CLI_PATH: &str = "EXTENSION_CLI_PATH";

pub const DEFAULT_S3_ENDPOINT: &str = "https://nyc3.digitaloceanspaces.com";
pub const DEFAULT_S3_REGION: &str = "nyc3";
pub const DEFAULT_EXTENSION_CLI: &str = "zed-extension";

/// HTTP設定
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// タイムアウト（秒）
    pub timeout: Option<Duration>,
    /// User-Agent
    pub user_agent: String,
    /// 一時的なエラーのリトライ回数
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(60)),
            user_agent: concat!("extpub/", env!("CARGO_PKG_VERSION")).to_string(),
            max_retries: 3,
        }
    }
}

impl HttpConfig {
    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

/// オブジェクトストアの接続設定
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub credentials: Credentials,
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    /// `https://<endpoint>/<bucket>` 形式でアクセスする
    pub force_path_style: bool,
}

/// 環境変数から読み込んだストア設定（未検証）
#[derive(Debug, Clone, Default)]
struct StoreEnv {
    access_key: Option<String>,
    secret_key: Option<String>,
    bucket: Option<String>,
    endpoint: String,
    region: String,
    force_path_style: bool,
}

impl StoreEnv {
    fn from_env() -> Self {
        Self {
            access_key: EnvVar::get(ENV_S3_ACCESS_KEY),
            secret_key: EnvVar::get(ENV_S3_SECRET_KEY),
            bucket: EnvVar::get(ENV_S3_BUCKET),
            endpoint: EnvVar::get_or(ENV_S3_ENDPOINT, DEFAULT_S3_ENDPOINT),
            region: EnvVar::get_or(ENV_S3_REGION, DEFAULT_S3_REGION),
            force_path_style: EnvVar::flag(ENV_S3_FORCE_PATH_STYLE),
        }
    }
}

/// 実行時設定
#[derive(Debug, Clone)]
pub struct Config {
    pub registry_path: PathBuf,
    pub gitmodules_path: PathBuf,
    /// パッケージをストアへアップロードする
    pub publish: bool,
    /// 現在のブランチ（CI から渡される場合）
    pub branch: Option<String>,
    /// パッケージングツールのパス
    pub extension_cli: String,
    pub http: HttpConfig,
    store: StoreEnv,
}

impl Config {
    /// 環境変数から設定を構築
    pub fn from_env(registry_path: impl Into<PathBuf>, gitmodules_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.into(),
            gitmodules_path: gitmodules_path.into(),
            publish: EnvVar::flag(ENV_SHOULD_PUBLISH),
            branch: EnvVar::get(ENV_GITHUB_REF_NAME),
            extension_cli: EnvVar::get_or(ENV_EXTENSION_CLI_PATH, DEFAULT_EXTENSION_CLI),
            http: HttpConfig::default(),
            store: StoreEnv::from_env(),
        }
    }

    /// リポジトリのルート（レジストリファイルのあるディレクトリ）
    pub fn root(&self) -> &Path {
        match self.registry_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// `git show <rev>:<path>` 用のレジストリのパス
    ///
    /// git は `root()` で実行するため、`./` を付けて作業ディレクトリ基準にする。
    pub fn registry_repo_path(&self) -> String {
        let name = self
            .registry_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("./{}", name)
    }

    /// ストア設定を取得。認証情報とバケット名は必須
    pub fn store_config(&self) -> Result<StoreConfig> {
        let access_key = required(&self.store.access_key, ENV_S3_ACCESS_KEY)?;
        let secret_key = required(&self.store.secret_key, ENV_S3_SECRET_KEY)?;
        let bucket = required(&self.store.bucket, ENV_S3_BUCKET)?;

        Ok(StoreConfig {
            credentials: Credentials {
                access_key,
                secret_key,
            },
            bucket,
            endpoint: self.store.endpoint.clone(),
            region: self.store.region.clone(),
            force_path_style: self.store.force_path_style,
        })
    }
}

fn required(value: &Option<String>, key: &'static str) -> Result<String> {
    value
        .clone()
        .ok_or(crate::error::PublishError::MissingConfig(key))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
