//! WebSocket module for Convoy
//!
//! Provides the real-time push endpoint:
//! - /ws/events - Live tracking event stream for the dashboard

pub mod events;

pub use events::events_handler;

use axum::{routing::get, Router};

/// Create the WebSocket router
pub fn websocket_router() -> Router {
    Router::new().route("/ws/events", get(events_handler))
}
