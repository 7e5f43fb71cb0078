//! git コマンドのラッパー
//!
//! リポジトリのルートをカレントディレクトリとして git を呼び出す。

use crate::error::{PublishError, Result};
use crate::process::ProcessCommand;
use std::path::PathBuf;

/// メインブランチ名
pub const MAIN_BRANCH: &str = "main";

/// 比較対象のリモートブランチ
pub const MAIN_REMOTE_REF: &str = "origin/main";

/// git リポジトリ
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn command(&self) -> ProcessCommand {
        ProcessCommand::new("git").current_dir(&self.root)
    }

    /// サブモジュールを浅くチェックアウト
    pub async fn checkout_submodule(&self, submodule_path: &str) -> Result<()> {
        tracing::info!(submodule = submodule_path, "checking out submodule");
        self.command()
            .args(["submodule", "update", "--init", "--depth", "1", submodule_path])
            .run_checked()
            .await?;
        Ok(())
    }

    /// 指定リビジョンのファイル内容
    pub async fn show_file(&self, revision: &str, path: &str) -> Result<String> {
        let output = self
            .command()
            .args(["show", &format!("{}:{}", revision, path)])
            .run_checked()
            .await?;
        Ok(output.stdout)
    }

    /// 2つのリビジョンの merge-base
    pub async fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        let output = self
            .command()
            .args(["merge-base", a, b])
            .run_checked()
            .await?;
        non_empty_line(output.stdout, "git merge-base")
    }

    /// 現在のブランチ名
    pub async fn current_branch(&self) -> Result<String> {
        let output = self
            .command()
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .run_checked()
            .await?;
        non_empty_line(output.stdout, "git rev-parse")
    }

    /// 差分検出の基準リビジョン
    ///
    /// main 上では `origin/main` そのもの、それ以外では HEAD との merge-base。
    pub async fn reference_revision(&self, branch: &str) -> Result<String> {
        if branch == MAIN_BRANCH {
            return Ok(MAIN_REMOTE_REF.to_string());
        }
        self.merge_base("HEAD", MAIN_REMOTE_REF).await
    }
}

fn non_empty_line(stdout: String, command: &str) -> Result<String> {
    let line = stdout.trim();
    if line.is_empty() {
        return Err(PublishError::ProcessFailed {
            command: command.to_string(),
            status: "empty output".to_string(),
            stderr: String::new(),
        });
    }
    Ok(line.to_string())
}

#[cfg(test)]
#[path = "git_test.rs"]
mod tests;
