//! EventBus - broadcast-based fan-out of live tracking events.
//!
//! The bot publishes location reports and registration changes here; every
//! dashboard WebSocket connection holds its own subscription.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::types::Location;

/// Events emitted while drivers are being tracked
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEvent {
    /// A driver reported a new position
    LocationUpdate {
        /// Session identifier
        driver_id: String,
        /// Reported position
        location: Location,
    },
    /// A Telegram user claimed a tracking link
    DriverRegistered {
        /// Session identifier
        driver_id: String,
        /// Telegram username
        username: String,
    },
    /// A driver stopped sharing
    DriverDeactivated {
        /// Session identifier
        driver_id: String,
    },
}

impl TrackingEvent {
    /// Driver the event refers to
    #[must_use]
    pub fn driver_id(&self) -> &str {
        match self {
            Self::LocationUpdate { driver_id, .. }
            | Self::DriverRegistered { driver_id, .. }
            | Self::DriverDeactivated { driver_id } => driver_id,
        }
    }
}

/// Broadcast-based event bus.
///
/// Slow subscribers miss events (lagged) rather than blocking the publisher.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TrackingEvent>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to all future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackingEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all active subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: TrackingEvent) -> usize {
        // send() returns Err if there are no receivers, which is fine
        self.sender.send(event).unwrap_or(0)
    }

    /// Current number of active subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
