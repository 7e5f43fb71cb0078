//! ライセンス検出
//!
//! ライセンスファミリーごとに「すべて一致しなければならない」パターン列を持つ。
//! 改変・省略されたライセンス文は検出しない。
//!
//! パターン中の空白は任意の空白（改行を含む）に一致する。

use crate::error::{PublishError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// ライセンス候補ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseCandidate {
    pub name: String,
    pub content: String,
}

impl LicenseCandidate {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// 受け入れ可能なライセンスファミリー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LicenseFamily {
    Mit,
    Apache2,
    Bsd2Clause,
    Bsd3Clause,
    GplV3,
    LgplV3,
    Zlib,
}

impl LicenseFamily {
    /// 判定順
    pub const ALL: [LicenseFamily; 7] = [
        LicenseFamily::Mit,
        LicenseFamily::Apache2,
        LicenseFamily::Bsd2Clause,
        LicenseFamily::Bsd3Clause,
        LicenseFamily::GplV3,
        LicenseFamily::LgplV3,
        LicenseFamily::Zlib,
    ];

    /// SPDX 識別子
    pub fn spdx_id(&self) -> &'static str {
        match self {
            LicenseFamily::Mit => "MIT",
            LicenseFamily::Apache2 => "Apache-2.0",
            LicenseFamily::Bsd2Clause => "BSD-2-Clause",
            LicenseFamily::Bsd3Clause => "BSD-3-Clause",
            LicenseFamily::GplV3 => "GPL-3.0",
            LicenseFamily::LgplV3 => "LGPL-3.0",
            LicenseFamily::Zlib => "Zlib",
        }
    }

    /// すべて一致しなければならないパターン（記載順に評価）
    fn required_patterns(&self) -> &'static [&'static str] {
        match self {
            LicenseFamily::Mit => &[
                r"MIT License",
                r"Copyright \(c\)",
                r"Permission is hereby granted, free of charge, to any person obtaining a copy",
                r"The above copyright notice and this permission notice shall be included in all",
                r#"THE SOFTWARE IS PROVIDED ["“”]AS IS["“”], WITHOUT WARRANTY OF ANY KIND, EXPRESS OR"#,
            ],
            LicenseFamily::Apache2 => &[
                r"Apache License",
                r"Version 2\.0, January 2004",
                r"https?://www\.apache\.org/licenses/",
                r"TERMS AND CONDITIONS FOR USE, REPRODUCTION, AND DISTRIBUTION",
                r"1\. Definitions\.",
                r"2\. Grant of Copyright License\.",
                r"3\. Grant of Patent License\.",
                r"4\. Redistribution\.",
                r"5\. Submission of Contributions\.",
                r"6\. Trademarks\.",
                r"7\. Disclaimer of Warranty\.",
                r"8\. Limitation of Liability\.",
                r"9\. Accepting Warranty or Additional Liability\.",
            ],
            LicenseFamily::Bsd2Clause => &[
                r"Redistribution and use in source and binary forms, with or without modification, are permitted provided that the following conditions are met",
                r"Redistributions of source code must retain the above copyright notice",
                r"Redistributions in binary form must reproduce the above copyright notice",
                r"THIS SOFTWARE IS PROVIDED BY",
                r"IN NO EVENT SHALL",
            ],
            LicenseFamily::Bsd3Clause => &[
                r"Redistribution and use in source and binary forms, with or without modification, are permitted provided that the following conditions are met",
                r"Redistributions of source code must retain the above copyright notice",
                r"Redistributions in binary form must reproduce the above copyright notice",
                r"Neither the name of",
                r"may be used to endorse or promote products derived from",
                r"THIS SOFTWARE IS PROVIDED BY",
                r"IN NO EVENT SHALL",
            ],
            LicenseFamily::GplV3 => &[
                r"GNU GENERAL PUBLIC LICENSE",
                r"Version 3, 29 June 2007",
                r"Everyone is permitted to copy and distribute verbatim copies of this license document, but changing it is not allowed",
                r"The GNU General Public License is a free, copyleft license for software and other kinds of works",
                r"TERMS AND CONDITIONS",
                r"0\. Definitions\.",
                r"END OF TERMS AND CONDITIONS",
            ],
            LicenseFamily::LgplV3 => &[
                r"GNU LESSER GENERAL PUBLIC LICENSE",
                r"Version 3, 29 June 2007",
                r"This version of the GNU Lesser General Public License incorporates the terms and conditions of version 3 of the GNU General Public License, supplemented by the additional permissions listed below",
                r"0\. Additional Definitions\.",
                r"1\. Exception to Section 3 of the GNU GPL\.",
            ],
            LicenseFamily::Zlib => &[
                r"This software is provided ['‘’]as-is['‘’], without any express or implied warranty",
                r"Permission is granted to anyone to use this software for any purpose, including commercial applications",
                r"The origin of this software must not be misrepresented",
                r"Altered source versions must be plainly marked as such",
                r"This notice may not be removed or altered from any source distribution",
            ],
        }
    }

    /// 一致してはならないパターン
    fn forbidden_patterns(&self) -> &'static [&'static str] {
        match self {
            // 3条項目があれば BSD-3-Clause
            LicenseFamily::Bsd2Clause => &[r"endorse or promote"],
            _ => &[],
        }
    }

    /// ライセンス文がこのファミリーに一致するか
    pub fn matches(&self, text: &str) -> bool {
        let Some(rules) = COMPILED_RULES.get(self) else {
            return false;
        };

        rules.required.iter().all(|re| re.is_match(text))
            && !rules.forbidden.iter().any(|re| re.is_match(text))
    }
}

impl std::fmt::Display for LicenseFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spdx_id())
    }
}

struct CompiledRules {
    required: Vec<Regex>,
    forbidden: Vec<Regex>,
}

static COMPILED_RULES: LazyLock<HashMap<LicenseFamily, CompiledRules>> = LazyLock::new(|| {
    LicenseFamily::ALL
        .iter()
        .map(|family| {
            let rules = CompiledRules {
                required: family.required_patterns().iter().filter_map(|p| compile(p)).collect(),
                forbidden: family.forbidden_patterns().iter().filter_map(|p| compile(p)).collect(),
            };
            (*family, rules)
        })
        .collect()
});

/// 大文字小文字を無視し、空白を任意の空白列として扱う
fn compile(pattern: &str) -> Option<Regex> {
    let pattern = format!("(?i){}", pattern.replace(' ', r"\s+"));
    Regex::new(&pattern).ok()
}

/// ライセンスファイルらしい名前か
///
/// 拡張子を除いた名前（小文字）が `license` / `licence` で始まるもの。
pub fn has_license_file_name(file_name: &str) -> bool {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    stem.starts_with("license") || stem.starts_with("licence")
}

/// ライセンス文のファミリーを判定
pub fn detect_license(text: &str) -> Option<LicenseFamily> {
    LicenseFamily::ALL
        .iter()
        .copied()
        .find(|family| family.matches(text))
}

/// 受け入れ可能なライセンスの一覧（表示用）
pub fn accepted_licenses() -> String {
    LicenseFamily::ALL
        .iter()
        .map(|f| f.spdx_id())
        .collect::<Vec<_>>()
        .join(", ")
}

/// ライセンス候補を検証
///
/// いずれかの候補が受け入れ可能なライセンスに一致すれば、そのファミリーを返す。
pub fn validate_license(candidates: &[LicenseCandidate]) -> Result<LicenseFamily> {
    if candidates.is_empty() {
        return Err(PublishError::NoLicenseFound);
    }

    if let Some(family) = candidates.iter().find_map(|c| detect_license(&c.content)) {
        return Ok(family);
    }

    Err(PublishError::NoValidLicense {
        files: candidates.iter().map(|c| c.name.clone()).collect(),
        accepted: accepted_licenses(),
    })
}

/// ディレクトリ直下のライセンス候補ファイルを読み込む（名前順）
pub fn read_license_candidates(dir: &Path) -> Result<Vec<LicenseCandidate>> {
    let mut candidates = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !has_license_file_name(&name) {
            continue;
        }

        let bytes = std::fs::read(&path)?;
        candidates.push(LicenseCandidate {
            name,
            content: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

#[cfg(test)]
#[path = "license_test.rs"]
mod tests;
