mod changeset;
mod cli;
mod commands;
mod config;
mod env;
mod error;
mod git;
mod gitmodules;
mod http;
mod license;
mod logging;
mod manifest;
mod output;
mod packager;
mod process;
mod registry;
mod store;
mod validation;

use clap::Parser;
use error::ErrorFormatter;

#[tokio::main]
async fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help / --version は成功扱い
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let verbose = cli.verbose;
    logging::init(verbose);

    if let Err(err) = commands::dispatch(cli).await {
        eprintln!("{}", ErrorFormatter::new(verbose).format(&err));
        std::process::exit(1);
    }
}
