//! Server module for Convoy
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Required settings and production warnings
//! - `channel_starters`: Telegram adapter startup
//! - `init`: Main server initialization and run loop

mod channel_starters;
pub mod config;
mod init;
mod loader;
mod validation;

// Re-export public API
pub use init::run;
pub use loader::{environment_name, load_config};
pub use validation::missing_required;
