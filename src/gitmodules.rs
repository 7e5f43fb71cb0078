//! サブモジュール定義（.gitmodules）
//!
//! git-config 形式のうち `[submodule "<name>"]` セクションのみを扱う。

use crate::error::{PublishError, Result};
use std::path::Path;

/// サブモジュール定義ファイル名
pub const GITMODULES_FILE: &str = ".gitmodules";

/// 1サブモジュール分のエントリ
///
/// `url` / `path` 以外のキー（`branch` など）も記載順に保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submodule {
    fields: Vec<(String, String)>,
}

impl Submodule {
    /// url と path を持つエントリを作成
    #[cfg(test)]
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            fields: vec![
                ("path".to_string(), path.into()),
                ("url".to_string(), url.into()),
            ],
        }
    }

    /// キーの値を取得（重複時は後勝ち）
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url").filter(|url| !url.is_empty())
    }

    pub fn path(&self) -> Option<&str> {
        self.get("path")
    }

    /// 全フィールド（記載順）
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    fn push(&mut self, key: String, value: String) {
        self.fields.push((key, value));
    }
}

/// サブモジュール名 → エントリ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmoduleMap {
    entries: Vec<(String, Submodule)>,
}

impl SubmoduleMap {
    /// .gitmodules の内容をパース
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut map = SubmoduleMap::default();
        let mut current: Option<usize> = None;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') {
                let name = parse_section_header(line).ok_or_else(|| {
                    PublishError::parse(
                        path,
                        format!("line {}: expected [submodule \"<name>\"], got `{}`", line_no, line),
                    )
                })?;
                current = Some(map.entry_index(name));
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(PublishError::parse(
                    path,
                    format!("line {}: expected `key = value`, got `{}`", line_no, line),
                ));
            };

            let Some(index) = current else {
                return Err(PublishError::parse(
                    path,
                    format!("line {}: `{}` appears outside of a section", line_no, key.trim()),
                ));
            };

            map.entries[index]
                .1
                .push(key.trim().to_ascii_lowercase(), parse_value(value));
        }

        Ok(map)
    }

    /// ファイルから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    pub fn get(&self, name: &str) -> Option<&Submodule> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, submodule)| submodule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Submodule)> {
        self.entries.iter().map(|(name, sm)| (name.as_str(), sm))
    }

    #[cfg(test)]
    pub fn insert(&mut self, name: impl Into<String>, submodule: Submodule) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = submodule,
            None => self.entries.push((name, submodule)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// サブモジュール名順に並べ替える
    pub fn sort(&mut self) {
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    /// git-config 形式で書き出す
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (name, submodule) in &self.entries {
            out.push_str(&format!("[submodule \"{}\"]\n", name));
            for (key, value) in submodule.fields() {
                out.push_str(&format!("\t{} = {}\n", key, format_value(value)));
            }
        }
        out
    }

    fn entry_index(&mut self, name: &str) -> usize {
        match self.entries.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.entries.push((name.to_string(), Submodule::default()));
                self.entries.len() - 1
            }
        }
    }
}

/// `[submodule "name"]` から name を取り出す
fn parse_section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    let rest = inner.strip_prefix("submodule")?.trim_start();
    rest.strip_prefix('"')?.strip_suffix('"')
}

/// git-config の値を解釈する
///
/// 引用符の外の `#` / `;` 以降はコメント。引用符の外の前後の空白は除く。
fn parse_value(raw: &str) -> String {
    let mut value = String::new();
    // 引用符内の文字は末尾の空白除去の対象外
    let mut kept = 0;
    let mut in_quotes = false;
    let mut chars = raw.trim_start().chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                kept = value.len();
            }
            '\\' => {
                match chars.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => break,
                }
                kept = value.len();
            }
            '#' | ';' if !in_quotes => break,
            c => {
                value.push(c);
                if in_quotes || !c.is_whitespace() {
                    kept = value.len();
                }
            }
        }
    }

    value.truncate(kept);
    value
}

/// 再パースで同じ値になるよう必要な場合だけ引用符で囲む
fn format_value(value: &str) -> String {
    let needs_quotes = value.contains(['#', ';', '"', '\\', '\n'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);

    if !needs_quotes {
        return value.to_string();
    }

    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    format!("\"{}\"", escaped)
}

/// .gitmodules をサブモジュール名順に並べ替えた文字列を返す
pub fn normalize_gitmodules_str(content: &str, path: &Path) -> Result<String> {
    let mut map = SubmoduleMap::parse(content, path)?;
    map.sort();
    Ok(format!("{}\n", map.serialize().trim_end()))
}

/// .gitmodules を書き換える。内容が変わった場合は true
pub fn normalize_gitmodules(path: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(path)?;
    let normalized = normalize_gitmodules_str(&content, path)?;

    if normalized == content {
        return Ok(false);
    }

    std::fs::write(path, normalized)?;
    Ok(true)
}

#[cfg(test)]
#[path = "gitmodules_test.rs"]
mod tests;
