//! extpub validate コマンド
//!
//! パッケージングを行わずにレジストリの検証だけを実行する。

use crate::config::Config;
use crate::error::Result;
use crate::git::GitRepo;
use crate::gitmodules::SubmoduleMap;
use crate::registry::Registry;
use crate::validation::{
    validate_extension_ids_not_changed, validate_registry, validate_submodule_locations,
    validate_submodules,
};
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::Path;

#[derive(Debug, Parser)]
pub struct Args {
    /// Also check that no extension ID was renamed since this revision
    #[arg(long, value_name = "REV")]
    pub reference: Option<String>,
}

/// レジストリと .gitmodules を読み込んで検証する
pub fn load_validated(config: &Config) -> Result<(Registry, SubmoduleMap)> {
    let registry = Registry::load(&config.registry_path)?;
    let submodules = SubmoduleMap::load(&config.gitmodules_path)?;

    validate_registry(&registry)?;
    validate_submodules(&submodules)?;
    validate_submodule_locations(&registry, &submodules)?;

    tracing::debug!(
        extensions = registry.len(),
        submodules = submodules.len(),
        "registry is valid"
    );
    Ok((registry, submodules))
}

/// 指定リビジョンのレジストリとIDの集合を比較する
async fn check_reference(config: &Config, registry: &Registry, revision: &str) -> Result<()> {
    let git = GitRepo::new(config.root());
    let repo_path = config.registry_repo_path();
    let content = git.show_file(revision, &repo_path).await?;
    let previous = Registry::parse(&content, Path::new(&format!("{}:{}", revision, repo_path)))?;

    validate_extension_ids_not_changed(registry.ids(), previous.ids())
}

pub async fn run(config: &Config, args: Args) -> Result<()> {
    let (registry, _) = load_validated(config)?;

    if let Some(revision) = &args.reference {
        check_reference(config, &registry, revision).await?;
    }

    println!(
        "{} {} extension(s) valid",
        "✓".green(),
        registry.len().green()
    );
    Ok(())
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
