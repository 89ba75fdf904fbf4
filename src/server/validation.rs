//! Configuration validation
//!
//! Start-up checks and production security warnings.

use super::config::AppConfig;
use super::loader::environment_name;
use anyhow::{bail, Result};
use tracing::warn;

/// Settings that must be present before serving.
///
/// The bot username is always needed to build tracking links; the token
/// only when the bot is going to run.
pub fn missing_required(config: &AppConfig, run_bot: bool) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if run_bot && config.telegram.token().is_none() {
        missing.push("TELEGRAM_BOT_TOKEN");
    }
    if config.telegram.username().is_none() {
        missing.push("TELEGRAM_BOT_USERNAME");
    }
    missing
}

/// Refuse to start with incomplete configuration
pub fn validate_required(config: &AppConfig, run_bot: bool) -> Result<()> {
    let missing = missing_required(config, run_bot);
    if !missing.is_empty() {
        bail!(
            "Missing required configuration: {}. Run 'convoy env' for setup help.",
            missing.join(", ")
        );
    }
    Ok(())
}

/// Whether the server runs in production mode
pub fn is_production(config: &AppConfig) -> bool {
    environment_name().eq_ignore_ascii_case("production") || !config.server.debug
}

/// Validate configuration for production security
pub fn validate_production_config(config: &AppConfig) {
    if !is_production(config) {
        return;
    }

    if config.server.host == "0.0.0.0" {
        warn!(
            "SECURITY WARNING: Server is binding to all interfaces (0.0.0.0) in production. \
             The dashboard has no authentication; consider binding to 127.0.0.1 behind a \
             reverse proxy."
        );
    }

    if config.server.allowed_hosts().any(|host| host == "*") {
        warn!("SECURITY WARNING: server.allowed_hosts contains a wildcard");
    }

    if config.tracking.max_generated_links == 0 {
        warn!("Tracking link generation is unlimited (tracking.max_generated_links = 0)");
    }
}
