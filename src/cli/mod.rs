//! CLI module for Convoy
//!
//! Provides commands:
//! - `serve`: Run the dashboard server and Telegram bot
//! - `config`: Show the resolved configuration
//! - `env`: Environment variable setup help

use clap::{Parser, Subcommand};

pub mod config;

/// Convoy driver tracking CLI
#[derive(Parser, Debug)]
#[command(name = "convoy")]
#[command(about = "Live driver tracking dashboard with a Telegram bot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Serve the dashboard and API without running the Telegram bot
        #[arg(long)]
        no_bot: bool,
    },
    /// Show the resolved configuration (secrets masked)
    Config,
    /// Print environment variable setup help
    Env,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve { no_bot }) => crate::server::run(no_bot).await,
        Some(Commands::Config) => config::show(),
        Some(Commands::Env) => {
            config::print_env_help();
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
