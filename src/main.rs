mod cli;
mod config;
mod error;
mod fetcher;
mod model;
mod normalizer;
mod providers;
mod render;
mod util;
mod writer;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jira_md=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => cli::handle_fetch(args).await,
        Commands::Version => {
            cli::print_version();
            Ok(())
        }
    }
}
