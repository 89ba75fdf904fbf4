//! API Client Module

pub mod client;
pub mod websocket;

pub use client::ApiClient;
pub use websocket::{use_tracking_websocket, WsState};
