//! パッケージ対象の拡張機能（change set）の決定
//!
//! - `diff`: 基準リビジョンのレジストリと比べてバージョンが変わったもの
//! - `unpublished`: ストアにそのバージョンがまだ無いもの

use crate::error::Result;
use crate::git::GitRepo;
use crate::registry::Registry;
use crate::store::{self, BlobStore, PublishedVersions};
use crate::validation::validate_extension_ids_not_changed;
use clap::ValueEnum;
use std::path::Path;

/// 対象の選び方
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChangeStrategy {
    /// 基準リビジョンとの差分
    #[value(name = "diff")]
    DiffAgainstReference,
    /// 未公開のバージョン
    Unpublished,
}

impl ChangeStrategy {
    /// 公開モードに応じたデフォルト
    pub fn default_for(publish: bool) -> Self {
        if publish {
            ChangeStrategy::Unpublished
        } else {
            ChangeStrategy::DiffAgainstReference
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStrategy::DiffAgainstReference => "diff",
            ChangeStrategy::Unpublished => "unpublished",
        }
    }
}

impl std::fmt::Display for ChangeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 基準レジストリに無い、またはバージョンが異なるID（レジストリ順）
pub fn changed_extension_ids(current: &Registry, reference: &Registry) -> Vec<String> {
    current
        .iter()
        .filter(|(id, entry)| {
            reference
                .get(id)
                .map_or(true, |previous| previous.version != entry.version)
        })
        .map(|(id, _)| id.to_string())
        .collect()
}

/// そのバージョンが未公開のID（レジストリ順）
pub fn unpublished_extension_ids(current: &Registry, published: &PublishedVersions) -> Vec<String> {
    current
        .iter()
        .filter(|(id, entry)| {
            !published
                .get(*id)
                .is_some_and(|versions| versions.contains(&entry.version))
        })
        .map(|(id, _)| id.to_string())
        .collect()
}

/// 指定IDのみに絞り込む
pub fn filter_selection(ids: Vec<String>, selected: Option<&str>) -> Vec<String> {
    match selected {
        Some(selected) => ids.into_iter().filter(|id| id == selected).collect(),
        None => ids,
    }
}

/// 基準リビジョンのレジストリ
#[derive(Debug, Clone)]
pub struct ReferenceRegistry {
    pub revision: String,
    pub registry: Registry,
}

/// 基準リビジョンのレジストリを git から読み込む
///
/// `branch` が None の場合は現在のブランチを git に問い合わせる。
pub async fn load_reference_registry(
    git: &GitRepo,
    branch: Option<&str>,
    registry_repo_path: &str,
) -> Result<ReferenceRegistry> {
    let branch = match branch {
        Some(branch) => branch.to_string(),
        None => git.current_branch().await?,
    };
    let revision = git.reference_revision(&branch).await?;
    tracing::info!(branch = %branch, revision = %revision, "using reference revision");

    let content = git.show_file(&revision, registry_repo_path).await?;
    let path = format!("{}:{}", revision, registry_repo_path);
    let registry = Registry::parse(&content, Path::new(&path))?;

    Ok(ReferenceRegistry { revision, registry })
}

/// 基準レジストリとの差分から change set を求める
///
/// IDの改名（削除と追加の同時発生）はエラー。
pub fn resolve_diff(current: &Registry, reference: &ReferenceRegistry) -> Result<Vec<String>> {
    validate_extension_ids_not_changed(current.ids(), reference.registry.ids())?;

    let ids = changed_extension_ids(current, &reference.registry);
    tracing::info!(
        revision = %reference.revision,
        "extensions changed from reference: {}",
        ids.join(", ")
    );
    Ok(ids)
}

/// ストアの公開状況から change set を求める
pub async fn resolve_unpublished(current: &Registry, store: &dyn BlobStore) -> Result<Vec<String>> {
    let published = store::published_versions(store).await?;
    let ids = unpublished_extension_ids(current, &published);
    tracing::info!("extensions needing to be published: {}", ids.join(", "));
    Ok(ids)
}

#[cfg(test)]
#[path = "changeset_test.rs"]
mod tests;
