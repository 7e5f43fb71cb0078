//! ログ出力の初期化
//!
//! `RUST_LOG` が設定されていればそれを優先し、
//! なければ `extpub=info`（`-v` 指定時は `extpub=debug`）を使う。
//! ログは stderr に出力する。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 既定のフィルター
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "extpub=debug"
    } else {
        "extpub=info"
    }
}

/// フィルターを構築
pub fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// グローバルな subscriber を設定する
///
/// 2回目以降の呼び出しは無視する。
pub fn init(verbose: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(fmt_layer)
        .try_init();
}
