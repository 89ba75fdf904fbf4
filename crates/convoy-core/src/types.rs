//! Domain types shared by the store, the HTTP API and the bot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Username shown for drivers whose Telegram account has no name yet
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// A single reported position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// When the position was reported
    pub timestamp: DateTime<Utc>,
}

/// Active driver without location data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSummary {
    /// Session identifier embedded in the tracking link
    pub driver_id: String,
    /// Telegram username, or [`UNKNOWN_USERNAME`]
    pub username: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

/// Active driver joined with its most recent location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSnapshot {
    /// Session identifier
    pub driver_id: String,
    /// Telegram username, or [`UNKNOWN_USERNAME`]
    pub username: String,
    /// Latest latitude, if the driver ever reported one
    pub latitude: Option<f64>,
    /// Latest longitude, if the driver ever reported one
    pub longitude: Option<f64>,
    /// Time of the latest location
    pub last_update: Option<DateTime<Utc>>,
}

impl DriverSnapshot {
    /// Latest position as `(latitude, longitude)` when both are known
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// A driver is online once a position has been received
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.latitude.is_some()
    }
}

/// Driver session bound to a Telegram user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverBinding {
    /// Session identifier
    pub driver_id: String,
    /// Telegram username at registration time
    pub username: Option<String>,
}

/// Response of the link generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLink {
    /// Freshly created session identifier
    pub driver_id: String,
    /// Deep link into the Telegram bot
    pub tracking_link: String,
    /// Text shown to the dispatcher
    pub instructions: String,
}
