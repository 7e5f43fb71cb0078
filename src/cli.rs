use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{package, validate};
use crate::gitmodules::GITMODULES_FILE;
use crate::registry::REGISTRY_FILE;

#[derive(Debug, Parser)]
#[command(name = "extpub", version)]
#[command(about = "Validate, package and publish editor extensions", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to the extension registry
    #[arg(long, global = true, default_value = REGISTRY_FILE)]
    pub registry: PathBuf,

    /// Path to the submodule file
    #[arg(long, global = true, default_value = GITMODULES_FILE)]
    pub gitmodules: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub package: package::Args,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sort the registry and submodule file
    Sort,

    /// Run the registry validators without packaging
    Validate(validate::Args),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::ChangeStrategy;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["extpub"]).unwrap();
        assert_eq!(cli.registry, PathBuf::from("extensions.toml"));
        assert_eq!(cli.gitmodules, PathBuf::from(".gitmodules"));
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
        assert!(cli.package.extension_id.is_none());
        assert!(cli.package.strategy.is_none());
        assert!(!cli.package.keep_going);
    }

    #[test]
    fn test_package_options() {
        let cli = Cli::try_parse_from([
            "extpub",
            "my-ext",
            "--strategy",
            "unpublished",
            "--keep-going",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.package.extension_id.as_deref(), Some("my-ext"));
        assert_eq!(cli.package.strategy, Some(ChangeStrategy::Unpublished));
        assert!(cli.package.keep_going);
        assert!(cli.verbose);
    }

    #[test]
    fn test_strategy_diff_name() {
        let cli = Cli::try_parse_from(["extpub", "--strategy", "diff"]).unwrap();
        assert_eq!(cli.package.strategy, Some(ChangeStrategy::DiffAgainstReference));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(Cli::try_parse_from(["extpub", "--strategy", "all"]).is_err());
    }

    #[test]
    fn test_sort_subcommand_with_global_paths() {
        let cli = Cli::try_parse_from(["extpub", "sort", "--registry", "reg/extensions.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Sort)));
        assert_eq!(cli.registry, PathBuf::from("reg/extensions.toml"));
    }

    #[test]
    fn test_validate_reference() {
        let cli = Cli::try_parse_from(["extpub", "validate", "--reference", "origin/main"]).unwrap();
        match cli.command {
            Some(Command::Validate(args)) => assert_eq!(args.reference.as_deref(), Some("origin/main")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_package_args_conflict_with_subcommand() {
        assert!(Cli::try_parse_from(["extpub", "sort", "--keep-going"]).is_err());
    }
}
