use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;

use super::{listing, subreddits};
use crate::cli::command::{Cli, Command};
use crate::core::config::ConfigReader;

pub async fn run() -> Result<()> {
    if let Ok(path) = dotenv() {
        tracing::info!("Env file: {:?} loaded", path);
    }
    let cli = Cli::parse();
    let config_reader = ConfigReader::init();

    match cli.command {
        Command::Subreddits { config, limit, fields } => {
            let config = config_reader.read_or_default(config).await?;
            subreddits::subreddits_command(config, limit, fields).await
        }
        Command::Listing { pathname, config, pages } => {
            let config = config_reader.read_or_default(config).await?;
            listing::listing_command(config, &pathname, pages).await
        }
    }
}
