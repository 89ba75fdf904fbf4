//! Convoy Channels - Driver Channel Adapters
//!
//! Drivers never open the dashboard; they share their position through a
//! messaging app. This crate provides the Telegram adapter (via teloxide)
//! that claims tracking links and forwards location reports.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod telegram;

pub use error::{Error, Result};

// Re-export Telegram adapter
pub use telegram::{AutoTrackingJobs, DriverCommand, TelegramAdapter, TelegramConfig};
