use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::Result;

pub mod package;
pub mod sort;
pub mod validate;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::from_env(cli.registry, cli.gitmodules);

    match cli.command {
        Some(Command::Sort) => sort::run(&config),
        Some(Command::Validate(args)) => validate::run(&config, args).await,
        None => package::run(&config, cli.package).await,
    }
}
