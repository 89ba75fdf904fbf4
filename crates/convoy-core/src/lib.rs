//! Convoy Core - Driver Tracking Engine
//!
//! This crate provides the server-side building blocks shared by the HTTP
//! dashboard and the Telegram bot:
//! - Store: SQLite persistence for driver sessions and locations
//! - Event bus: broadcast fan-out of live tracking events
//! - Tracking: link issuing, driver registration and location ingest
//! - Shutdown: coordinated cancellation of long-running tasks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event_bus;
pub mod shutdown;
pub mod store;
pub mod tracking;
pub mod types;

pub use error::{Error, Result};
pub use event_bus::{EventBus, TrackingEvent};
pub use shutdown::{shutdown_signal_with_controller, wait_for_shutdown_signal, ShutdownController};
pub use store::TrackingStore;
pub use tracking::{validate_coordinates, TrackingConfig, TrackingService};
pub use types::{DriverBinding, DriverSnapshot, DriverSummary, GeneratedLink, Location};
