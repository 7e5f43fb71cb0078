//! 拡張機能のパッケージング
//!
//! 選択された拡張機能を1つずつ順に処理する。
//!
//! 1. サブモジュールをチェックアウト
//! 2. 拡張機能ディレクトリを解決
//! 3. 旧形式マニフェストを拒否
//! 4. extension.toml の ID とレジストリの ID を照合
//! 5. ライセンスを検証（不正ならツールは呼ばない）
//! 6. パッケージングツールを実行
//! 7. 出力マニフェストのバージョンを照合
//! 8. 出力マニフェストを検証
//! 9. 公開モードならストアへアップロード

pub mod tool;

pub use tool::{PackagingTool, ToolOutput};

use crate::error::{PublishError, Result};
use crate::git::GitRepo;
use crate::license::{read_license_candidates, validate_license, LicenseFamily};
use crate::manifest::{ExtensionManifest, PackageManifest, EXTENSION_TOML, LEGACY_EXTENSION_JSON};
use crate::registry::{ExtensionEntry, Registry};
use crate::store::{object_key, BlobStore};
use crate::validation::validate_manifest;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tempfile::TempDir;
use walkdir::WalkDir;

/// ビルドディレクトリの接頭辞
const BUILD_DIR_PREFIX: &str = "build-";

/// スクラッチディレクトリ名
const SCRATCH_DIR: &str = "scratch";

/// サブモジュールのチェックアウト
pub trait SubmoduleCheckout: Send + Sync {
    fn checkout<'a>(
        &'a self,
        submodule_path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

impl SubmoduleCheckout for GitRepo {
    fn checkout<'a>(
        &'a self,
        submodule_path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.checkout_submodule(submodule_path))
    }
}

/// 失敗時の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 最初の失敗で中断
    #[default]
    FailFast,
    /// すべて試行し、最後にまとめて失敗
    KeepGoing,
}

/// 実行中のビルドディレクトリ
///
/// ドロップ時に削除される。
#[derive(Debug)]
pub struct BuildDir {
    dir: TempDir,
}

impl BuildDir {
    /// 作業ディレクトリ内に作成
    pub fn create_in(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(BUILD_DIR_PREFIX)
            .tempdir_in(parent)?;
        tracing::debug!(path = %dir.path().display(), "created build directory");
        Ok(Self { dir })
    }

    /// 全拡張機能で共有するスクラッチディレクトリ
    pub fn scratch_dir(&self) -> PathBuf {
        self.dir.path().join(SCRATCH_DIR)
    }

    /// 拡張機能ごとの出力ディレクトリ
    pub fn output_dir(&self, id: &str) -> PathBuf {
        self.dir.path().join(id)
    }
}

/// 1拡張機能の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Packaged,
    Published { files: usize },
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// 1拡張機能分のレポート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionReport {
    pub id: String,
    pub version: String,
    pub license: Option<LicenseFamily>,
    pub warnings: Vec<String>,
    pub outcome: Outcome,
}

/// 実行全体のレポート
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub extensions: Vec<ExtensionReport>,
}

impl RunReport {
    pub fn failed_ids(&self) -> Vec<String> {
        self.extensions
            .iter()
            .filter(|r| r.outcome.is_failure())
            .map(|r| r.id.clone())
            .collect()
    }

    /// 失敗があれば `BatchFailed`
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed_ids();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(PublishError::BatchFailed(failed))
        }
    }
}

/// パッケージングに成功した拡張機能
#[derive(Debug, Clone)]
struct Packaged {
    license: LicenseFamily,
    warnings: Vec<String>,
    uploaded: Option<usize>,
}

/// パッケージングドライバー
pub struct Packager<'a> {
    root: &'a Path,
    checkout: &'a dyn SubmoduleCheckout,
    tool: &'a PackagingTool,
    build: &'a BuildDir,
    store: Option<&'a dyn BlobStore>,
    policy: FailurePolicy,
}

impl<'a> Packager<'a> {
    pub fn new(
        root: &'a Path,
        checkout: &'a dyn SubmoduleCheckout,
        tool: &'a PackagingTool,
        build: &'a BuildDir,
    ) -> Self {
        Self {
            root,
            checkout,
            tool,
            build,
            store: None,
            policy: FailurePolicy::default(),
        }
    }

    /// 公開モード（パッケージをアップロードする）
    pub fn with_store(mut self, store: &'a dyn BlobStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 選択された拡張機能を順に処理する
    ///
    /// `FailFast` では最初のエラーをそのまま返す。
    /// `KeepGoing` では失敗をレポートに記録して続行する。
    pub async fn run(&self, registry: &Registry, ids: &[String]) -> Result<RunReport> {
        let mut report = RunReport::default();

        for id in ids {
            let Some(entry) = registry.get(id) else {
                tracing::warn!(extension = %id, "not found in registry, skipping");
                continue;
            };

            tracing::info!("Packaging '{}'. Version: {}", id, entry.version);

            match self.package_extension(id, entry).await {
                Ok(packaged) => report.extensions.push(ExtensionReport {
                    id: id.clone(),
                    version: entry.version.clone(),
                    license: Some(packaged.license),
                    warnings: packaged.warnings,
                    outcome: match packaged.uploaded {
                        Some(files) => Outcome::Published { files },
                        None => Outcome::Packaged,
                    },
                }),
                Err(e) if self.policy == FailurePolicy::KeepGoing => {
                    tracing::error!(extension = %id, error = %e, "packaging failed");
                    report.extensions.push(ExtensionReport {
                        id: id.clone(),
                        version: entry.version.clone(),
                        license: None,
                        warnings: Vec::new(),
                        outcome: Outcome::Failed(e.to_string()),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    async fn package_extension(&self, id: &str, entry: &ExtensionEntry) -> Result<Packaged> {
        self.checkout.checkout(entry.submodule_path()).await?;

        let source_dir = entry.extension_dir(self.root);
        check_source_manifest(id, &source_dir)?;

        let candidates = read_license_candidates(&source_dir)?;
        let license = validate_license(&candidates)?;
        tracing::debug!(extension = id, license = %license, "license accepted");

        let scratch_dir = self.build.scratch_dir();
        let output_dir = self.build.output_dir(id);
        std::fs::create_dir_all(&scratch_dir)?;
        std::fs::create_dir_all(&output_dir)?;

        let ToolOutput { warnings } = self
            .tool
            .package(id, &scratch_dir, &source_dir, &output_dir)
            .await?;

        let manifest = PackageManifest::load_from_dir(&output_dir)?;
        if manifest.version != entry.version {
            return Err(PublishError::VersionMismatch {
                id: id.to_string(),
                name: manifest.name,
                expected: entry.version.clone(),
                actual: manifest.version,
            });
        }
        validate_manifest(&manifest)?;

        let uploaded = match self.store {
            Some(store) => Some(upload_output(store, id, &entry.version, &output_dir).await?),
            None => None,
        };

        Ok(Packaged {
            license,
            warnings,
            uploaded,
        })
    }
}

/// 旧形式マニフェストの拒否と extension.toml の照合
fn check_source_manifest(id: &str, source_dir: &Path) -> Result<()> {
    let legacy = source_dir.join(LEGACY_EXTENSION_JSON);
    if legacy.exists() {
        return Err(PublishError::LegacyManifestFormat(legacy));
    }

    let manifest_path = source_dir.join(EXTENSION_TOML);
    if manifest_path.exists() {
        let manifest = ExtensionManifest::load(&manifest_path)?;
        if manifest.id != id {
            return Err(PublishError::IdMismatch {
                expected: id.to_string(),
                actual: manifest.id,
            });
        }
        validate_manifest(&manifest)?;
    }

    Ok(())
}

/// 出力ディレクトリ内のファイルをすべてアップロード
///
/// アップロードしたファイル数を返す。
async fn upload_output(
    store: &dyn BlobStore,
    id: &str,
    version: &str,
    output_dir: &Path,
) -> Result<usize> {
    tracing::info!("Uploading {} version {}", id, version);

    let mut count = 0;
    for entry in WalkDir::new(output_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| PublishError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(output_dir)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let key = object_key(id, version, &relative);
        let body = tokio::fs::read(entry.path()).await?;
        store.put_object(&key, body).await?;
        tracing::debug!(key = %key, "uploaded");
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
#[path = "packager_test.rs"]
mod tests;
