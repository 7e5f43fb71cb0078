//! extpub（既定コマンド）
//!
//! 検証、正規化、change set の決定、パッケージング、公開までを行う。

use crate::changeset::{
    filter_selection, load_reference_registry, resolve_diff, resolve_unpublished, ChangeStrategy,
};
use crate::commands::{sort, validate};
use crate::config::Config;
use crate::error::Result;
use crate::git::GitRepo;
use crate::output::{report_table, CommandSummary};
use crate::packager::{BuildDir, FailurePolicy, Packager, PackagingTool};
use crate::store::S3Store;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Package only this extension
    #[arg(value_name = "EXTENSION_ID")]
    pub extension_id: Option<String>,

    /// How to pick the extensions to package [default: unpublished when publishing, otherwise diff]
    #[arg(long, value_enum)]
    pub strategy: Option<ChangeStrategy>,

    /// Attempt every extension and report failures at the end
    #[arg(long)]
    pub keep_going: bool,
}

impl Args {
    pub fn strategy(&self, publish: bool) -> ChangeStrategy {
        self.strategy
            .unwrap_or_else(|| ChangeStrategy::default_for(publish))
    }

    pub fn policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        }
    }
}

/// ストアへの接続が必要か
pub fn needs_store(publish: bool, strategy: ChangeStrategy) -> bool {
    publish || strategy == ChangeStrategy::Unpublished
}

pub async fn run(config: &Config, args: Args) -> Result<()> {
    // 1. 検証
    let (registry, _) = validate::load_validated(config)?;

    // 2. 正規化
    sort::normalize_files(config)?;

    // 3. change set
    let strategy = args.strategy(config.publish);
    tracing::info!(strategy = %strategy, publish = config.publish, "resolving extensions to package");

    let store = if needs_store(config.publish, strategy) {
        Some(S3Store::new(config.store_config()?, &config.http))
    } else {
        None
    };

    let git = GitRepo::new(config.root());
    let ids = match (strategy, &store) {
        (ChangeStrategy::Unpublished, Some(store)) => resolve_unpublished(&registry, store).await?,
        _ => {
            let reference = load_reference_registry(
                &git,
                config.branch.as_deref(),
                &config.registry_repo_path(),
            )
            .await?;
            resolve_diff(&registry, &reference)?
        }
    };
    let ids = filter_selection(ids, args.extension_id.as_deref());

    if ids.is_empty() {
        println!("{}", CommandSummary::format(0, 0));
        return Ok(());
    }

    // 4. パッケージング
    let build = BuildDir::create_in(&std::env::current_dir()?)?;
    let tool = PackagingTool::new(&config.extension_cli);
    let mut packager = Packager::new(config.root(), &git, &tool, &build).with_policy(args.policy());
    if let (true, Some(store)) = (config.publish, &store) {
        packager = packager.with_store(store);
    }

    let report = packager.run(&registry, &ids).await?;

    println!("{}", report_table(&report));
    println!("{}", CommandSummary::from_report(&report));

    report.into_result().map(|_| ())
}
