//! Channel adapter startup functions

use super::config::AppConfig;
use convoy_channels::{TelegramAdapter, TelegramConfig};
use convoy_core::{ShutdownController, TrackingService};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Start the Telegram adapter
pub fn start_telegram_adapter(
    config: &AppConfig,
    tracking: &Arc<TrackingService>,
    shutdown_controller: &ShutdownController,
) -> Option<tokio::task::JoinHandle<()>> {
    let Some(token) = config.telegram.token() else {
        warn!("Telegram adapter not started: bot token not set");
        return None;
    };

    let mut telegram_config = TelegramConfig::new(token)
        .with_auto_track_interval(config.tracking.auto_track_interval());
    if let Some(username) = config.telegram.username() {
        telegram_config = telegram_config.with_bot_username(username);
    }

    let telegram_adapter = Arc::new(TelegramAdapter::new(telegram_config));
    let telegram_tracking = tracking.clone();
    let telegram_shutdown = shutdown_controller.token();

    let handle = tokio::spawn(async move {
        if let Err(e) = telegram_adapter
            .run(telegram_tracking, telegram_shutdown)
            .await
        {
            error!("Telegram adapter error: {}", e);
        }
    });

    info!("Telegram adapter started");
    Some(handle)
}
