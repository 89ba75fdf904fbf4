//! Telegram adapter core

use super::config::TelegramConfig;
use super::jobs::AutoTrackingJobs;
use teloxide::{prelude::*, types::User};

/// Telegram bot adapter
pub struct TelegramAdapter {
    pub(crate) bot: Bot,
    pub(crate) config: TelegramConfig,
    pub(crate) jobs: AutoTrackingJobs,
}

impl TelegramAdapter {
    /// Create a new Telegram adapter
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        let bot = Bot::new(&config.bot_token);
        Self {
            bot,
            config,
            jobs: AutoTrackingJobs::new(),
        }
    }

    /// Name stored for a driver: Telegram username, else first name
    pub(crate) fn display_name(user: &User) -> String {
        user.username
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user.first_name.clone())
    }
}
