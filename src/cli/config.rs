//! CLI configuration display
//!
//! `convoy config` prints the resolved settings; `convoy env` prints the
//! environment variables a deployment usually sets.

use crate::server::{environment_name, load_config, missing_required};
use anyhow::{Context, Result};

const ENV_HELP: &str = r#"
Environment Variables Setup:

Required:
  TELEGRAM_BOT_TOKEN="your_bot_token_here"
  TELEGRAM_BOT_USERNAME="your_bot_username"

Optional:
  DATABASE_PATH="data/tracking.db"
  AUTO_TRACK_INTERVAL="30"
  MAX_GENERATED_LINKS="100"
  ALLOWED_HOSTS="localhost,127.0.0.1"
  CONVOY_ENV="development"           # selects config/<CONVOY_ENV>.toml
  CONVOY_SERVER__HOST="0.0.0.0"
  CONVOY_SERVER__PORT="5000"
  CONVOY_SERVER__DEBUG="false"
  RUST_LOG="convoy=info,tower_http=info"

Or create a .env file:
  TELEGRAM_BOT_TOKEN=your_bot_token_here
  TELEGRAM_BOT_USERNAME=your_bot_username
"#;

/// Print the resolved configuration with secrets masked
pub fn show() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;

    println!("Server configuration ({}):", environment_name());
    println!();
    let rendered =
        toml::to_string_pretty(&config.masked()).context("Failed to render configuration")?;
    println!("{}", rendered);

    let missing = missing_required(&config, config.telegram.enabled);
    if missing.is_empty() {
        println!("All required settings are present.");
    } else {
        println!("Missing required settings:");
        for item in missing {
            println!("  - {}", item);
        }
    }
    Ok(())
}

/// Print environment setup help
pub fn print_env_help() {
    println!("{}", ENV_HELP);
}
