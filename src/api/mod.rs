//! Web API module for Convoy
//!
//! Provides REST API endpoints for:
//! - Tracking link generation
//! - Driver listings and positions
//! - Health checks and API documentation

pub mod docs;
pub mod drivers;
pub mod error;
pub mod health;
pub mod links;

#[cfg(test)]
mod tests;

use axum::{Extension, Router};
use convoy_core::TrackingService;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use docs::docs_routes;
pub use drivers::drivers_routes;
pub use health::health_routes;
pub use links::links_routes;

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new().merge(links_routes()).merge(drivers_routes())
}

/// Full application router: REST, health, docs and the live event socket
pub fn app_router(tracking: Arc<TrackingService>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(docs_routes())
        .merge(api_router())
        .merge(crate::websocket::websocket_router())
        .layer(Extension(tracking))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
