//! Server configuration types
//!
//! Contains all configuration structures for the Convoy server.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub tracking: TrackingSettings,
    #[serde(default)]
    pub events: EventsConfig,
}

impl AppConfig {
    /// Copy of the configuration that is safe to print
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        config.telegram.bot_token = config.telegram.bot_token.as_deref().map(mask_secret);
        config
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
    /// Directory holding the built dashboard bundle
    #[serde(default = "default_web_ui_dir")]
    pub web_ui_dir: String,
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            web_ui_dir: default_web_ui_dir(),
            allowed_hosts: default_allowed_hosts(),
        }
    }
}

impl ServerConfig {
    /// Comma-separated `allowed_hosts`, trimmed, blanks dropped
    pub fn allowed_hosts(&self) -> impl Iterator<Item = &str> {
        self.allowed_hosts
            .split(',')
            .map(str::trim)
            .filter(|host| !host.is_empty())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_web_ui_dir() -> String {
    "apps/web/dist".to_string()
}

fn default_allowed_hosts() -> String {
    "localhost,127.0.0.1".to_string()
}

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "data/tracking.db".to_string()
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub bot_username: Option<String>,
    #[serde(default)]
    pub bot_token: Option<String>,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_username: None,
            bot_token: None,
        }
    }
}

impl TelegramSettings {
    /// Bot username without a leading `@`, if set and non-empty
    pub fn username(&self) -> Option<&str> {
        self.bot_username
            .as_deref()
            .map(|name| name.trim().trim_start_matches('@'))
            .filter(|name| !name.is_empty())
    }

    /// Bot token, if set and non-empty
    pub fn token(&self) -> Option<&str> {
        self.bot_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

fn default_true() -> bool {
    true
}

/// Link issuing and auto-tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSettings {
    #[serde(default = "default_auto_track_interval")]
    pub auto_track_interval_secs: u64,
    /// Pending sessions allowed at once (0 = unlimited)
    #[serde(default = "default_max_generated_links")]
    pub max_generated_links: usize,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            auto_track_interval_secs: default_auto_track_interval(),
            max_generated_links: default_max_generated_links(),
        }
    }
}

impl TrackingSettings {
    pub fn auto_track_interval(&self) -> Duration {
        Duration::from_secs(self.auto_track_interval_secs.max(1))
    }
}

fn default_auto_track_interval() -> u64 {
    30
}

fn default_max_generated_links() -> usize {
    100
}

/// Live event fan-out configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Events buffered per subscriber before it lags
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

fn default_event_capacity() -> usize {
    256
}

/// Mask a secret for display, keeping a short prefix and suffix
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(!config.server.debug);
        assert_eq!(config.database.path, "data/tracking.db");
        assert!(config.telegram.enabled);
        assert_eq!(config.tracking.auto_track_interval_secs, 30);
        assert_eq!(config.tracking.max_generated_links, 100);
        assert_eq!(config.events.capacity, 256);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [telegram]
            bot_username = "@convoy_bot"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.telegram.username(), Some("convoy_bot"));
        assert_eq!(config.tracking.max_generated_links, 100);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let settings = TelegramSettings {
            enabled: true,
            bot_username: Some("  ".to_string()),
            bot_token: Some(String::new()),
        };
        assert_eq!(settings.username(), None);
        assert_eq!(settings.token(), None);
    }

    #[test]
    fn test_allowed_hosts_split() {
        let mut server = ServerConfig::default();
        assert_eq!(
            server.allowed_hosts().collect::<Vec<_>>(),
            vec!["localhost", "127.0.0.1"]
        );

        server.allowed_hosts = " a.example , ,b.example".to_string();
        assert_eq!(
            server.allowed_hosts().collect::<Vec<_>>(),
            vec!["a.example", "b.example"]
        );
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("123456:ABCDEFGHIJ"), "1234...GHIJ");
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn test_masked_config_hides_token() {
        let mut config = AppConfig::default();
        config.telegram.bot_token = Some("123456:ABCDEFGHIJ".to_string());

        let masked = config.masked();
        assert_eq!(masked.telegram.bot_token.as_deref(), Some("1234...GHIJ"));
        assert_eq!(
            config.telegram.bot_token.as_deref(),
            Some("123456:ABCDEFGHIJ")
        );
    }

    #[test]
    fn test_zero_interval_clamped() {
        let settings = TrackingSettings {
            auto_track_interval_secs: 0,
            max_generated_links: 0,
        };
        assert_eq!(settings.auto_track_interval(), Duration::from_secs(1));
    }
}
