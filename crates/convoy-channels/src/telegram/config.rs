//! Telegram configuration types

use std::time::Duration;

/// Default delay between auto-tracking location prompts
pub const DEFAULT_AUTO_TRACK_INTERVAL: Duration = Duration::from_secs(30);

/// Telegram bot configuration
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token
    pub bot_token: String,
    /// Bot username (without `@`), used in tracking links
    pub bot_username: String,
    /// Delay between location prompts while auto tracking
    pub auto_track_interval: Duration,
}

impl TelegramConfig {
    /// Create with a bot token
    #[must_use]
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            bot_username: String::new(),
            auto_track_interval: DEFAULT_AUTO_TRACK_INTERVAL,
        }
    }

    /// Set the bot username
    #[must_use]
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = username.into().trim_start_matches('@').to_string();
        self
    }

    /// Set the auto-tracking interval
    #[must_use]
    pub fn with_auto_track_interval(mut self, interval: Duration) -> Self {
        self.auto_track_interval = interval;
        self
    }

    /// Whether `actual` (the name Telegram reports for the token) is the bot
    /// that tracking links point to
    #[must_use]
    pub fn matches_bot_username(&self, actual: &str) -> bool {
        self.bot_username.eq_ignore_ascii_case(actual.trim_start_matches('@'))
    }
}
