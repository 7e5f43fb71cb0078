//! レジストリ・サブモジュール・マニフェストの検証
//!
//! いずれも副作用のない関数で、最初に見つかった違反をエラーとして返す。

use crate::error::{PublishError, Result};
use crate::gitmodules::SubmoduleMap;
use crate::manifest::DisplayManifest;
use crate::registry::Registry;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// 対応している schema_version
pub const SUPPORTED_SCHEMA_VERSIONS: &[i64] = &[1];

/// ホストのブランド名
pub const BRAND_NAME: &str = "Zed";

/// 予約された拡張IDの接頭辞
pub const RESERVED_ID_PREFIX: &str = "zed-";

/// 予約された拡張IDの接尾辞
pub const RESERVED_ID_SUFFIX: &str = "-zed";

/// `zed-` で始まってよい拡張ID
///
/// 変更はメンテナのみが行う。
pub const EXTENSION_ID_STARTS_WITH_EXCEPTIONS: &[&str] = &[];

/// `-zed` で終わってよい拡張ID
///
/// 変更はメンテナのみが行う。
pub const EXTENSION_ID_ENDS_WITH_EXCEPTIONS: &[&str] = &["xy-zed"];

/// `extensions/<id>` 以外に配置されてよいサブモジュール名
pub const SUBMODULE_LOCATION_EXCEPTIONS: &[&str] = &["extensions/zed"];

/// ブランド名で始まってよい表示名
pub const LEGACY_NAME_EXCEPTIONS: &[&str] = &["Zed Legacy Themes"];

/// サブモジュールの配置ディレクトリ
pub const EXTENSIONS_DIR: &str = "extensions";

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid extension id pattern"));

/// 拡張IDの書式を検証
pub fn validate_extension_id(id: &str) -> Result<()> {
    if !ID_PATTERN.is_match(id) {
        return Err(PublishError::InvalidIdFormat(id.to_string()));
    }

    if id.starts_with(RESERVED_ID_PREFIX) && !EXTENSION_ID_STARTS_WITH_EXCEPTIONS.contains(&id) {
        return Err(PublishError::ReservedPrefix {
            id: id.to_string(),
            prefix: RESERVED_ID_PREFIX,
            brand: BRAND_NAME,
        });
    }

    if id.ends_with(RESERVED_ID_SUFFIX) && !EXTENSION_ID_ENDS_WITH_EXCEPTIONS.contains(&id) {
        return Err(PublishError::ReservedSuffix {
            id: id.to_string(),
            suffix: RESERVED_ID_SUFFIX,
            brand: BRAND_NAME,
        });
    }

    Ok(())
}

/// レジストリの全IDを検証
pub fn validate_registry(registry: &Registry) -> Result<()> {
    registry.ids().try_for_each(validate_extension_id)
}

/// サブモジュールの URL を検証
pub fn validate_submodules(submodules: &SubmoduleMap) -> Result<()> {
    for (name, submodule) in submodules.iter() {
        let url = submodule
            .url()
            .ok_or_else(|| PublishError::MissingUrl(name.to_string()))?;

        if !url.starts_with("https://") {
            return Err(PublishError::InsecureScheme {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
    }

    Ok(())
}

/// 各エントリのサブモジュールが `extensions/<id>` に配置されているか検証
pub fn validate_submodule_locations(registry: &Registry, submodules: &SubmoduleMap) -> Result<()> {
    for (id, entry) in registry.iter() {
        let name = entry.submodule_path();
        let submodule = submodules
            .get(name)
            .ok_or_else(|| PublishError::UnknownSubmodule {
                id: id.to_string(),
                submodule: name.to_string(),
            })?;

        if SUBMODULE_LOCATION_EXCEPTIONS.contains(&name) {
            continue;
        }

        let expected = format!("{}/{}", EXTENSIONS_DIR, id);
        let path = submodule.path().unwrap_or_default();
        if name != expected || path != expected {
            return Err(PublishError::SubmoduleNameMismatch {
                id: id.to_string(),
                expected,
                name: name.to_string(),
                path: path.to_string(),
            });
        }
    }

    Ok(())
}

/// マニフェストの表示名と schema_version を検証
pub fn validate_manifest(manifest: &impl DisplayManifest) -> Result<()> {
    let name = manifest.display_name();
    let prefix = format!("{} ", BRAND_NAME);
    let suffix = format!(" {}", BRAND_NAME);

    if name.starts_with(&prefix) && !LEGACY_NAME_EXCEPTIONS.contains(&name) {
        return Err(PublishError::ReservedName {
            name: name.to_string(),
            rule: format!("start with \"{}\"", prefix),
            brand: BRAND_NAME,
        });
    }

    if name.ends_with(&suffix) {
        return Err(PublishError::ReservedName {
            name: name.to_string(),
            rule: format!("end with \"{}\"", suffix),
            brand: BRAND_NAME,
        });
    }

    if let Some(version) = manifest.schema_version() {
        if !SUPPORTED_SCHEMA_VERSIONS.contains(&version) {
            return Err(PublishError::SchemaVersionInvalid(version));
        }
    }

    Ok(())
}

/// 拡張IDの集合が「改名」されていないか検証
///
/// 追加のみ・削除のみは許可し、同時に起きた場合はエラー。
pub fn validate_extension_ids_not_changed<'a, C, P>(current: C, previous: P) -> Result<()>
where
    C: IntoIterator<Item = &'a str>,
    P: IntoIterator<Item = &'a str>,
{
    let current: BTreeSet<&str> = current.into_iter().collect();
    let previous: BTreeSet<&str> = previous.into_iter().collect();

    let removed: Vec<String> = previous.difference(&current).map(|s| s.to_string()).collect();
    let added: Vec<String> = current.difference(&previous).map(|s| s.to_string()).collect();

    if !removed.is_empty() && !added.is_empty() {
        return Err(PublishError::IdSetChanged { removed, added });
    }

    Ok(())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
