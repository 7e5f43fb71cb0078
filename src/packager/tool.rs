//! 外部パッケージングツールの呼び出し

use crate::error::{PublishError, Result};
use crate::process::{ProcessCommand, ProcessOutput};
use std::path::Path;

/// パッケージングツール
#[derive(Debug, Clone)]
pub struct PackagingTool {
    program: String,
}

/// ツールの実行結果（成功時）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// stderr のうち警告を含む行
    pub warnings: Vec<String>,
}

impl PackagingTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 実行するコマンド
    pub fn command(&self, scratch_dir: &Path, source_dir: &Path, output_dir: &Path) -> ProcessCommand {
        ProcessCommand::new(&self.program)
            .arg("--scratch-dir")
            .arg(scratch_dir.to_string_lossy())
            .arg("--source-dir")
            .arg(source_dir.to_string_lossy())
            .arg("--output-dir")
            .arg(output_dir.to_string_lossy())
    }

    /// 拡張機能をパッケージングする
    ///
    /// 非0終了は `PackagingFailed`。警告行は結果として返す。
    pub async fn package(
        &self,
        id: &str,
        scratch_dir: &Path,
        source_dir: &Path,
        output_dir: &Path,
    ) -> Result<ToolOutput> {
        let output = self.command(scratch_dir, source_dir, output_dir).run().await?;
        interpret(id, output)
    }
}

fn interpret(id: &str, output: ProcessOutput) -> Result<ToolOutput> {
    let warnings = collect_warnings(&output.stderr);
    for warning in &warnings {
        tracing::warn!(extension = id, "{}", warning);
    }

    if !output.success() {
        return Err(PublishError::PackagingFailed {
            id: id.to_string(),
            status: output.status_label(),
            stderr: output.stderr.trim_end().to_string(),
        });
    }

    Ok(ToolOutput { warnings })
}

/// `warning:` を含む行（大文字小文字は区別しない）
pub fn collect_warnings(stderr: &str) -> Vec<String> {
    stderr
        .lines()
        .filter(|line| line.to_lowercase().contains("warning:"))
        .map(|line| line.trim().to_string())
        .collect()
}

#[cfg(test)]
#[path = "tool_test.rs"]
mod tests;
