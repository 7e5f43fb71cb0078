//! 外部プロセスの実行
//!
//! 終了コードが非0でもエラーにはせず、結果を構造体で返す。
//! 致命的かどうかは呼び出し側が判断する。

use crate::error::{PublishError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// 実行するコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// 実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// 終了コード（シグナル終了時は None）
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// 表示用のコマンドライン
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 実行して出力を取得
    ///
    /// 起動に失敗した場合のみエラー。
    pub async fn run(&self) -> Result<ProcessOutput> {
        tracing::debug!(command = %self.display(), "spawning process");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            PublishError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to spawn `{}`: {}", self.program, e),
            ))
        })?;

        let result = ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(
            command = %self.display(),
            status = %result.status_label(),
            "process finished"
        );

        Ok(result)
    }

    /// 実行し、非0終了を `ProcessFailed` として返す
    pub async fn run_checked(&self) -> Result<ProcessOutput> {
        self.run().await?.into_result(&self.display())
    }
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// 終了状態の表示用文字列
    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }

    /// 非0終了を `ProcessFailed` に変換
    pub fn into_result(self, command: &str) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }

        Err(PublishError::ProcessFailed {
            command: command.to_string(),
            status: self.status_label(),
            stderr: self.stderr.trim_end().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "process_test.rs"]
mod tests;
