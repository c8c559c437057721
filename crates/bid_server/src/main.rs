//! Bidding tic-tac-toe server binary.

use anyhow::Result;
use bid_server::ServerConfig;
use bid_server::cli::{Cli, Command};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::CheckConfig { config } => check_config(&config),
    }
}

async fn run_server(
    config: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,bid_server=debug")),
        )
        .init();

    let config = ServerConfig::load(config.as_deref())?
        .with_overrides(std::env::var("PORT").ok(), host, port)?;
    info!(?config, "Starting bidding tic-tac-toe server");

    bid_server::serve(config).await
}

fn check_config(path: &std::path::Path) -> Result<()> {
    let config = ServerConfig::from_file(path)?;
    print!("{}", toml::to_string(&config)?);
    Ok(())
}
