//! API Documentation
//!
//! Serves the OpenAPI document at /api/openapi.json

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use super::{
    drivers::{DriverSummaryView, DriverView, LocationView},
    error::ErrorBody,
    health::HealthResponse,
    links::GeneratedLinkView,
};

/// Convoy API OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Convoy API",
        version = "1.0.0",
        description = "Live driver tracking REST API.

## Overview
- **Links**: Issue Telegram deep links that bind a driver to a session
- **Drivers**: Active drivers and their latest reported positions
- **Health**: Service and database status

Live updates are pushed over the WebSocket at `/ws/events` as JSON frames
(`connected`, `location_update`, `driver_registered`, `driver_deactivated`).
",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        crate::api::links::generate_link,
        crate::api::drivers::all_drivers,
        crate::api::drivers::active_drivers,
        crate::api::drivers::driver_location,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            GeneratedLinkView,
            DriverView,
            DriverSummaryView,
            LocationView,
            HealthResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "links", description = "Tracking link generation"),
        (name = "drivers", description = "Driver positions"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create documentation routes
pub fn docs_routes() -> Router {
    Router::new().route("/api/openapi.json", get(openapi_json))
}
