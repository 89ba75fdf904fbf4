//! Convoy - Live Driver Tracking
//!
//! CLI entry point for the Convoy server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod server;
mod websocket;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "convoy=info,convoy_core=info,convoy_channels=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();

    if matches!(cli.command, Some(cli::Commands::Serve { .. }))
        && !std::path::Path::new(".env").exists()
    {
        warn!(".env file not found. Run 'convoy env' for the variables to set.");
    }

    cli::run(cli).await
}
