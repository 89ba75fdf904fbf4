//! Error types for convoy-channels

use thiserror::Error;

/// Channel error type
#[derive(Debug, Error)]
pub enum Error {
    /// Telegram rejected the bot token or could not be reached
    #[error("telegram error: {0}")]
    Telegram(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
