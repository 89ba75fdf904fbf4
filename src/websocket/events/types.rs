use convoy_core::{Location, TrackingEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message from a dashboard client
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for keepalive
    Ping,
}

/// Frame pushed to dashboard clients
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventNotification {
    /// Connection established
    Connected { session_id: Uuid },
    /// A driver reported a new position
    LocationUpdate {
        driver_id: String,
        location: Location,
    },
    /// A Telegram user claimed a tracking link
    DriverRegistered { driver_id: String, username: String },
    /// A driver stopped sharing
    DriverDeactivated { driver_id: String },
    /// Pong response
    Pong,
    /// Error notification
    Error {
        message: String,
        code: Option<String>,
    },
}

impl From<TrackingEvent> for EventNotification {
    fn from(event: TrackingEvent) -> Self {
        match event {
            TrackingEvent::LocationUpdate {
                driver_id,
                location,
            } => Self::LocationUpdate {
                driver_id,
                location,
            },
            TrackingEvent::DriverRegistered {
                driver_id,
                username,
            } => Self::DriverRegistered {
                driver_id,
                username,
            },
            TrackingEvent::DriverDeactivated { driver_id } => {
                Self::DriverDeactivated { driver_id }
            }
        }
    }
}
