//! extpub sort コマンド
//!
//! レジストリと .gitmodules を決まった順序に書き換える。

use crate::config::Config;
use crate::error::Result;
use crate::gitmodules::normalize_gitmodules;
use crate::registry::normalize_registry;
use owo_colors::OwoColorize;
use std::path::Path;

/// 両ファイルを正規化する
///
/// 書き換えたファイルのパスを返す。
pub fn normalize_files(config: &Config) -> Result<Vec<&Path>> {
    let mut changed = Vec::new();

    if normalize_registry(&config.registry_path)? {
        changed.push(config.registry_path.as_path());
    }
    if normalize_gitmodules(&config.gitmodules_path)? {
        changed.push(config.gitmodules_path.as_path());
    }

    for path in &changed {
        tracing::debug!(path = %path.display(), "normalized");
    }

    Ok(changed)
}

pub fn run(config: &Config) -> Result<()> {
    let changed = normalize_files(config)?;

    if changed.is_empty() {
        println!("{} Already sorted", "•".yellow());
    } else {
        for path in changed {
            println!("{} Sorted {}", "✓".green(), path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod tests;
