//! Driver commands, reply keyboards and fixed reply texts

use std::time::Duration;
use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

pub(crate) const START_AUTO_TRACKING: &str = "🔄 Start Auto Tracking";
pub(crate) const STOP_AUTO_TRACKING: &str = "🛑 Stop Auto Tracking";
pub(crate) const SHARE_LOCATION_ONCE: &str = "📍 Share Location Once";
pub(crate) const SEND_LOCATION: &str = "📍 Send Location";
pub(crate) const LOCATION_PIN: &str = "📍";
pub(crate) const LOCATION_PROMPT: &str = "📍 Please share your current location:";

pub(crate) const NOT_REGISTERED: &str = "❌ You're not registered as a driver.";
pub(crate) const ALREADY_RUNNING: &str = "⚠️ Auto tracking is already running!";
pub(crate) const NOT_RUNNING: &str = "⚠️ Auto tracking is not running!";
pub(crate) const AUTO_TRACKING_STOPPED: &str = "🛑 Auto tracking stopped!";
pub(crate) const TRACKING_STOPPED: &str =
    "🛑 Tracking stopped. Thank you for using Driver Tracking!";
pub(crate) const STOP_FAILED: &str = "❌ Failed to stop tracking.";
pub(crate) const NOT_TRACKED: &str = "❌ You're not currently being tracked.";

const LOCATION_CALLBACK_PREFIX: &str = "loc_";

/// Something a driver asked the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    /// `/start [driver_id]` (the deep-link payload)
    Start {
        /// Session id carried by the tracking link
        driver_id: Option<String>,
    },
    /// `/stop`
    Stop,
    /// Keyboard button: begin periodic location prompts
    StartAutoTracking,
    /// Keyboard button: end periodic location prompts
    StopAutoTracking,
}

impl DriverCommand {
    /// Parse a text message. Returns `None` for free text.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Some(rest) = text.strip_prefix('/') {
            let mut parts = rest.split_whitespace();
            let command = parts.next()?;
            // "/start@convoy_bot" in groups
            let command = command.split('@').next().unwrap_or(command);

            return match command.to_lowercase().as_str() {
                "start" => Some(Self::Start {
                    driver_id: parts.next().map(str::to_string),
                }),
                "stop" => Some(Self::Stop),
                _ => None,
            };
        }

        match text {
            START_AUTO_TRACKING => Some(Self::StartAutoTracking),
            STOP_AUTO_TRACKING => Some(Self::StopAutoTracking),
            _ => None,
        }
    }
}

/// Callback payload attached to the "Send Location" inline button
#[must_use]
pub fn location_callback_data(driver_id: &str) -> String {
    format!("{}{}", LOCATION_CALLBACK_PREFIX, driver_id)
}

/// Extract the driver id from a location callback payload
#[must_use]
pub fn parse_location_callback(data: &str) -> Option<&str> {
    data.strip_prefix(LOCATION_CALLBACK_PREFIX)
        .filter(|id| !id.is_empty())
}

/// Reply sent when auto tracking begins
pub(crate) fn auto_tracking_started_text(interval: Duration) -> String {
    format!(
        "🔄 Auto tracking started!\n\n\
         📍 I'll request your location every {} seconds\n\
         ⚠️ Keep Telegram notifications ON\n\
         ⚠️ Don't completely close Telegram\n\n\
         You can minimize the app, but keep it running in background.",
        interval.as_secs()
    )
}

/// One-time keyboard with a single location-sharing button
pub(crate) fn location_request_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(LOCATION_PIN).request(ButtonRequest::Location)
    ]])
    .resize_keyboard()
    .one_time_keyboard()
}

/// Keyboard shown while auto tracking is running
pub(crate) fn stop_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(STOP_AUTO_TRACKING)]]).resize_keyboard()
}

/// Keyboard shown once auto tracking has stopped
pub(crate) fn idle_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(SHARE_LOCATION_ONCE).request(ButtonRequest::Location)],
        vec![KeyboardButton::new(START_AUTO_TRACKING)],
    ])
    .resize_keyboard()
}

/// Inline prompt sent on every auto-tracking tick
pub(crate) fn location_prompt_keyboard(driver_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        SEND_LOCATION,
        location_callback_data(driver_id),
    )]])
}
