//! 拡張機能レジストリ（extensions.toml）
//!
//! 拡張ID → エントリのマッピング。ファイル記載順を保持する。
//!
//! ```toml
//! [my-extension]
//! submodule = "extensions/my-extension"
//! path = "crates/extension"   # 任意: サブモジュール内のサブパス
//! version = "0.1.0"
//!
//! [legacy-extension]
//! path = "extensions/legacy-extension"   # 旧形式: path がサブモジュールのパス
//! version = "1.2.3"
//! ```

use crate::error::{PublishError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// レジストリファイル名
pub const REGISTRY_FILE: &str = "extensions.toml";

/// レジストリ内の1拡張分のエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submodule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub version: String,
}

impl ExtensionEntry {
    /// 現行形式のエントリを作成
    #[cfg(test)]
    pub fn new(submodule: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            submodule: Some(submodule.into()),
            path: None,
            version: version.into(),
        }
    }

    /// サブパスを設定
    #[cfg(test)]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// サブモジュールのパス
    ///
    /// 旧形式（`submodule` なし）では `path` がサブモジュールのパスを表す。
    pub fn submodule_path(&self) -> &str {
        self.submodule
            .as_deref()
            .or(self.path.as_deref())
            .unwrap_or_default()
    }

    /// サブモジュール内のサブパス（現行形式のみ）
    pub fn sub_path(&self) -> Option<&str> {
        self.submodule.as_ref().and(self.path.as_deref())
    }

    /// 拡張機能のディレクトリを解決
    pub fn extension_dir(&self, root: &Path) -> PathBuf {
        let submodule_dir = root.join(self.submodule_path());
        match self.sub_path() {
            Some(sub) => submodule_dir.join(sub),
            None => submodule_dir,
        }
    }
}

/// 拡張機能レジストリ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<(String, ExtensionEntry)>,
}

impl Registry {
    /// TOML文字列からパース
    ///
    /// `path` はエラーメッセージ用。
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| PublishError::parse(path, e.message()))?;

        let mut entries = Vec::with_capacity(table.len());
        for (id, value) in table {
            let entry = value
                .try_into::<ExtensionEntry>()
                .map_err(|e: toml::de::Error| {
                    PublishError::parse(path, format!("entry \"{}\": {}", id, e.message()))
                })?;

            if entry.submodule.is_none() && entry.path.is_none() {
                return Err(PublishError::parse(
                    path,
                    format!("entry \"{}\" must declare `submodule` or `path`", id),
                ));
            }

            entries.push((id, entry));
        }

        Ok(Self { entries })
    }

    /// ファイルから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// 記載順にイテレート
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtensionEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// 記載順の拡張ID
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// IDでエントリを検索
    pub fn get(&self, id: &str) -> Option<&ExtensionEntry> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(String, ExtensionEntry)> for Registry {
    fn from_iter<I: IntoIterator<Item = (String, ExtensionEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// レジストリ文字列をID順に並べ替えた文字列を返す
///
/// エントリ内のキー順と未知のキーはそのまま保持する。
pub fn normalize_registry_str(content: &str, path: &Path) -> Result<String> {
    let mut table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| PublishError::parse(path, e.message()))?;

    let mut ids: Vec<String> = table.keys().cloned().collect();
    ids.sort();

    let mut sorted = toml::Table::new();
    for id in ids {
        if let Some(value) = table.remove(&id) {
            sorted.insert(id, value);
        }
    }

    let serialized = toml::to_string(&sorted).map_err(|e| PublishError::parse(path, e))?;
    Ok(format!("{}\n", serialized.trim_end()))
}

/// レジストリファイルをID順に書き換える
///
/// 内容が変わった場合は true を返す。
pub fn normalize_registry(path: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(path)?;
    let normalized = normalize_registry_str(&content, path)?;

    if normalized == content {
        return Ok(false);
    }

    std::fs::write(path, normalized)?;
    Ok(true)
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
