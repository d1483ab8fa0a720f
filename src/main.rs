//! Codebridge CLI entry point.

use anyhow::Result;
use clap::Parser;

use codebridge::cli::{commands, handle_error, Cli, Commands};
use codebridge::domain::models::config::Config;
use codebridge::infrastructure::config::ConfigLoader;
use codebridge::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        handle_error(&err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config: Config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let _logger = LoggerImpl::init(&config.logging)?;

    match command {
        Commands::Ingest { docs_dir } => commands::ingest::execute(&config, docs_dir, json).await,
        Commands::Query { text, k } => commands::query::execute(&config, text, k, json).await,
        Commands::Stats => commands::stats::execute(&config, json).await,
    }
}
