//! Error types for convoy-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// SQLite failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure (creating the data directory)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Coordinates outside the WGS84 range or not finite
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates {
        /// Rejected latitude
        latitude: f64,
        /// Rejected longitude
        longitude: f64,
    },

    /// Too many unclaimed tracking links are outstanding
    #[error("tracking link limit reached ({limit} pending sessions)")]
    LinkLimitReached {
        /// Configured maximum
        limit: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
