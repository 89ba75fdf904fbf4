//! Telegram - teloxide adapter
//!
//! Drivers open a tracking link (`https://t.me/<bot>?start=<driver_id>`),
//! which binds their Telegram account to the session. From then on every
//! location they share is stored and pushed to the dashboard. The bot stays
//! silent towards drivers except for the auto-tracking controls.

mod adapter;
mod commands;
mod config;
mod flow;
mod handler;
mod jobs;

#[cfg(test)]
mod tests;

// Re-export all public types
pub use adapter::TelegramAdapter;
pub use commands::{parse_location_callback, DriverCommand};
pub use config::TelegramConfig;
pub use jobs::{AutoTrackingJobs, JobHandle};
