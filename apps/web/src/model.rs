//! Wire types shared with the server

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Active driver with its latest position, from `GET /api/all-drivers`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverSnapshot {
    pub driver_id: String,
    pub username: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_update: Option<DateTime<Utc>>,
}

impl DriverSnapshot {
    /// Position when both coordinates are known
    pub fn position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn is_online(&self) -> bool {
        self.latitude.is_some()
    }

    /// List key that changes whenever anything shown in the row changes
    pub fn render_key(&self) -> String {
        format!(
            "{}:{}:{:?}:{:?}:{:?}",
            self.driver_id,
            self.username,
            self.latitude.map(f64::to_bits),
            self.longitude.map(f64::to_bits),
            self.last_update
        )
    }
}

/// Position carried by a `location_update` push
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// Response of `GET /generate-link`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedLink {
    pub driver_id: String,
    pub tracking_link: String,
    pub instructions: String,
}

/// Frame pushed by the server on `/ws/events`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Connection established
    Connected { session_id: String },
    /// A driver reported a new position
    LocationUpdate {
        driver_id: String,
        location: LocationPayload,
    },
    /// A Telegram user claimed a tracking link
    DriverRegistered { driver_id: String, username: String },
    /// A driver stopped sharing
    DriverDeactivated { driver_id: String },
    /// Pong response
    Pong,
    /// Error message
    Error {
        message: String,
        code: Option<String>,
    },
}
