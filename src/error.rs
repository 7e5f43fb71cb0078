pub mod code;
pub mod formatter;

pub use code::ErrorCode;
pub use formatter::ErrorFormatter;

use std::path::PathBuf;
use thiserror::Error;

/// extpub 統一エラー型
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to parse '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error(
        "Extension IDs must only consist of lowercase letters, numbers, and hyphens ('-'): \"{0}\"."
    )]
    InvalidIdFormat(String),

    #[error(
        "Extension IDs should not start with \"{prefix}\", as they are all {brand} extensions: \"{id}\"."
    )]
    ReservedPrefix {
        id: String,
        prefix: &'static str,
        brand: &'static str,
    },

    #[error(
        "Extension IDs should not end with \"{suffix}\", as they are all {brand} extensions: \"{id}\"."
    )]
    ReservedSuffix {
        id: String,
        suffix: &'static str,
        brand: &'static str,
    },

    #[error("Extension names should not {rule}, as they are all {brand} extensions: \"{name}\".")]
    ReservedName {
        name: String,
        rule: String,
        brand: &'static str,
    },

    #[error("Missing URL for \"{0}\".")]
    MissingUrl(String),

    #[error("Submodules must use \"https://\" scheme: \"{name}\" has URL \"{url}\".")]
    InsecureScheme { name: String, url: String },

    #[error("Extension \"{id}\" refers to submodule \"{submodule}\", which is not listed in .gitmodules.")]
    UnknownSubmodule { id: String, submodule: String },

    #[error(
        "Submodule for extension \"{id}\" should be located at \"{expected}\" (name: \"{name}\", path: \"{path}\")."
    )]
    SubmoduleNameMismatch {
        id: String,
        expected: String,
        name: String,
        path: String,
    },

    #[error("Extension repository does not contain a license file.")]
    NoLicenseFound,

    #[error(
        "Extension repository does not contain a valid license. Accepted licenses: {accepted}. Rejected files: {}.",
        .files.join(", ")
    )]
    NoValidLicense { files: Vec<String>, accepted: String },

    #[error("Extension IDs changed ({}; {}). Rename extensions by changing their display name, not their ID.", summarize_ids("removed", .removed), summarize_ids("added", .added))]
    IdSetChanged {
        removed: Vec<String>,
        added: Vec<String>,
    },

    #[error("Extension ID mismatch: extensions.toml declares \"{expected}\" but extension.toml declares \"{actual}\".")]
    IdMismatch { expected: String, actual: String },

    #[error("Incorrect version for extension {id} ({name})\n\nExpected version: {expected}\nActual version: {actual}")]
    VersionMismatch {
        id: String,
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported schema_version {0} (supported: {supported}).", supported = supported_schema_versions())]
    SchemaVersionInvalid(i64),

    #[error("Legacy manifest '{}' is no longer supported; migrate to extension.toml.", .0.display())]
    LegacyManifestFormat(PathBuf),

    #[error("Packaging extension '{id}' failed ({status}):\n{stderr}")]
    PackagingFailed {
        id: String,
        status: String,
        stderr: String,
    },

    #[error("Command `{command}` failed ({status}):\n{stderr}")]
    ProcessFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Invalid blob store key \"{key}\": {reason}")]
    InvalidObjectKey { key: String, reason: &'static str },

    #[error("Blob store error: {message} (status: {status})")]
    BlobStore { status: u16, message: String },

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("Missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    #[error("{} extension(s) failed to package: {}", .0.len(), .0.join(", "))]
    BatchFailed(Vec<String>),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PublishError>;

fn supported_schema_versions() -> String {
    crate::validation::SUPPORTED_SCHEMA_VERSIONS
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn summarize_ids(label: &str, ids: &[String]) -> String {
    if ids.is_empty() {
        format!("0 {label}")
    } else {
        format!("{} {label}: {}", ids.len(), ids.join(", "))
    }
}

impl PublishError {
    /// パースエラーを生成
    pub fn parse(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        PublishError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// エラーコード
    pub fn code(&self) -> ErrorCode {
        match self {
            PublishError::Parse { .. } => ErrorCode::Prs001,
            PublishError::InvalidIdFormat(_) => ErrorCode::Reg001,
            PublishError::ReservedPrefix { .. } | PublishError::ReservedSuffix { .. } => {
                ErrorCode::Reg002
            }
            PublishError::IdSetChanged { .. } => ErrorCode::Reg003,
            PublishError::MissingUrl(_) => ErrorCode::Sub001,
            PublishError::InsecureScheme { .. } => ErrorCode::Sub002,
            PublishError::UnknownSubmodule { .. } => ErrorCode::Sub003,
            PublishError::SubmoduleNameMismatch { .. } => ErrorCode::Sub004,
            PublishError::NoLicenseFound => ErrorCode::Lic001,
            PublishError::NoValidLicense { .. } => ErrorCode::Lic002,
            PublishError::ReservedName { .. } => ErrorCode::Man001,
            PublishError::SchemaVersionInvalid(_) => ErrorCode::Man002,
            PublishError::IdMismatch { .. } => ErrorCode::Man003,
            PublishError::VersionMismatch { .. } => ErrorCode::Man004,
            PublishError::LegacyManifestFormat(_) => ErrorCode::Man005,
            PublishError::PackagingFailed { .. } | PublishError::BatchFailed(_) => {
                ErrorCode::Pkg001
            }
            PublishError::ProcessFailed { .. } => ErrorCode::Pkg002,
            PublishError::InvalidObjectKey { .. } => ErrorCode::Sto001,
            PublishError::BlobStore { .. } | PublishError::Signing(_) => ErrorCode::Sto002,
            PublishError::MissingConfig(_) => ErrorCode::Cfg001,
            PublishError::Network(_) => ErrorCode::Net001,
            PublishError::Io(_) => ErrorCode::Io001,
        }
    }

    /// リトライ可能なエラーかどうか
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::Network(_) => true,
            PublishError::BlobStore { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
