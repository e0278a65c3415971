use clap::Parser;
use stash_review_config::AppConfig;
use std::process::ExitCode;

mod cli;
mod commands;
mod editor;
mod logger;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(cli.overrides());
    logger::init(config.debug);
    log::debug!("effective config: {:?}", config);

    match &cli.command {
        Commands::Review(args) => commands::review::run(&config, args).await,
        Commands::Ls(args) => {
            commands::listing::ls(&config, args).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::LsReviews(args) => {
            commands::listing::ls_reviews(&config, args).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
