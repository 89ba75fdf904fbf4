//! Events WebSocket handler
//!
//! Pushes live tracking events to dashboard clients.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    Extension,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};
use uuid::Uuid;

use convoy_core::{EventBus, TrackingService};

mod types;

#[cfg(test)]
mod tests;

pub use types::{ClientMessage, EventNotification};

/// WebSocket upgrade handler
pub async fn events_handler(
    ws: WebSocketUpgrade,
    Extension(tracking): Extension<Arc<TrackingService>>,
) -> impl IntoResponse {
    let event_bus = tracking.event_bus().clone();
    ws.on_upgrade(move |socket| handle_socket(socket, event_bus))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, event_bus: EventBus) {
    let session_id = Uuid::new_v4();
    info!("Dashboard connected: {}", session_id);

    let (mut sender, mut receiver) = socket.split();

    // Subscribe before announcing so no event slips in between
    let mut event_rx = event_bus.subscribe();

    if let Some(json) = encode(&EventNotification::Connected { session_id }) {
        if sender.send(Message::Text(json)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            // Client messages
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_client_message(&text);
                        if let Some(json) = encode(&response) {
                            if sender.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Dashboard disconnected: {}", session_id);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }
            // EventBus events
            event = event_rx.recv() => {
                match event {
                    Ok(tracking_event) => {
                        debug!(
                            session_id = %session_id,
                            driver_id = %tracking_event.driver_id(),
                            "Forwarding tracking event"
                        );
                        if let Some(json) = encode(&EventNotification::from(tracking_event)) {
                            if sender.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(session_id = %session_id, lagged = n, "Event subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }

    info!("Dashboard connection ended: {}", session_id);
}

/// Answer a text frame from the client
fn handle_client_message(text: &str) -> EventNotification {
    debug!("Received client message: {}", text);
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping) => EventNotification::Pong,
        Err(e) => EventNotification::Error {
            message: format!("Invalid message format: {}", e),
            code: Some("INVALID_MESSAGE".to_string()),
        },
    }
}

fn encode(notification: &EventNotification) -> Option<String> {
    match serde_json::to_string(notification) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "Failed to encode event notification");
            None
        }
    }
}
