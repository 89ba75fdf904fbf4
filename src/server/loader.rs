//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Flat environment variables honoured for existing deployments
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("TELEGRAM_BOT_USERNAME", "telegram.bot_username"),
    ("DATABASE_PATH", "database.path"),
    ("AUTO_TRACK_INTERVAL", "tracking.auto_track_interval_secs"),
    ("MAX_GENERATED_LINKS", "tracking.max_generated_links"),
    ("ALLOWED_HOSTS", "server.allowed_hosts"),
];

/// Name of the active environment (`CONVOY_ENV`, default `development`)
pub fn environment_name() -> String {
    std::env::var("CONVOY_ENV").unwrap_or_else(|_| "development".to_string())
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", environment_name())).required(false))
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables
        // prefix_separator("_") so CONVOY_SERVER__PORT works with a single
        // underscore after the prefix.
        .add_source(
            Environment::with_prefix("CONVOY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // 4. Flat variables (highest priority)
    let builder = apply_legacy_overrides(builder, |name| std::env::var(name).ok())?;

    builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

fn apply_legacy_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>> {
    for (var, key) in LEGACY_ENV_OVERRIDES {
        let value = lookup(var).filter(|v| !v.trim().is_empty());
        builder = builder
            .set_override_option(*key, value)
            .with_context(|| format!("Invalid override for {}", key))?;
    }
    Ok(builder)
}
