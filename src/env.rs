//! 環境変数ユーティリティ

/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// 環境変数を取得（空文字列はNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.is_empty())
    }

    /// 環境変数を取得（未設定時はデフォルト値）
    pub fn get_or(key: &str, default: &str) -> String {
        Self::get(key).unwrap_or_else(|| default.to_string())
    }

    /// `"true"` のときだけ true
    pub fn flag(key: &str) -> bool {
        Self::get(key).is_some_and(|v| v == "true")
    }
}

#[cfg(test)]
#[path = "env_test.rs"]
mod tests;
