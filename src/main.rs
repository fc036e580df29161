use anyhow::Result;
use clap::Parser;
use lineup::cli::Cli;
use lineup::{game_runner, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config();
    logging::init_logging(config.log_file.as_deref())?;

    game_runner::run(config).await
}
