//! 拡張機能マニフェスト
//!
//! - `extension.toml`: 拡張機能リポジトリ側のマニフェスト
//! - `manifest.json`: パッケージングツールが出力するマニフェスト

use crate::error::{PublishError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 拡張機能マニフェストのファイル名
pub const EXTENSION_TOML: &str = "extension.toml";

/// 旧形式のマニフェストファイル名（非対応）
pub const LEGACY_EXTENSION_JSON: &str = "extension.json";

/// パッケージングツールが出力するマニフェストのファイル名
pub const PACKAGE_MANIFEST: &str = "manifest.json";

/// 表示名とスキーマバージョンを持つマニフェスト
pub trait DisplayManifest {
    fn display_name(&self) -> &str;
    fn schema_version(&self) -> Option<i64>;
}

/// extension.toml のスキーマ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub schema_version: Option<i64>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

impl ExtensionManifest {
    /// TOMLからパース
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e: toml::de::Error| PublishError::parse(path, e.message()))
    }

    /// ファイルから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }
}

impl DisplayManifest for ExtensionManifest {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn schema_version(&self) -> Option<i64> {
        self.schema_version
    }
}

/// manifest.json のスキーマ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub schema_version: Option<i64>,
}

impl PackageManifest {
    /// JSONからパース
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PublishError::parse(path, e))
    }

    /// 出力ディレクトリから読み込み
    pub fn load_from_dir(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(PACKAGE_MANIFEST);
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content, &path)
    }
}

impl DisplayManifest for PackageManifest {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn schema_version(&self) -> Option<i64> {
        self.schema_version
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
