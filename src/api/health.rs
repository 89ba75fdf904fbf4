//! Health check endpoint
//!
//! `/health` reports the service name, version and whether SQLite answers.

use axum::{routing::get, Extension, Json, Router};
use convoy_core::TrackingService;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "driver-tracking-web";

/// Health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// `connected` or `error`
    pub database: &'static str,
    pub version: &'static str,
    /// Live dashboard connections
    pub subscribers: usize,
    /// Tracking links not yet claimed by a driver
    pub pending_links: Option<usize>,
}

/// Health check (for load balancers)
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(
    Extension(tracking): Extension<Arc<TrackingService>>,
) -> Json<HealthResponse> {
    let database = match tracking.store().ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            "error"
        }
    };

    let pending_links = if database == "connected" {
        tracking.store().pending_session_count().await.ok()
    } else {
        None
    };

    Json(HealthResponse {
        status: if database == "connected" {
            "healthy"
        } else {
            "degraded"
        },
        service: SERVICE_NAME,
        database,
        version: env!("CARGO_PKG_VERSION"),
        subscribers: tracking.event_bus().subscriber_count(),
        pending_links,
    })
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}
