//! Driver API endpoints
//!
//! GET /api/all-drivers - Active drivers with their latest position
//! GET /api/drivers - Active drivers without positions
//! GET /api/driver-location/:driver_id - Latest position of one driver

use axum::{extract::Path, routing::get, Extension, Json, Router};
use chrono::{DateTime, Utc};
use convoy_core::{DriverSnapshot, DriverSummary, Location, TrackingService};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::error::{ApiError, ErrorBody};

/// Reported position
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationView {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<Location> for LocationView {
    fn from(location: Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            timestamp: location.timestamp,
        }
    }
}

/// Active driver with its latest position (null until the first report)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DriverView {
    pub driver_id: String,
    pub username: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_update: Option<DateTime<Utc>>,
}

impl From<DriverSnapshot> for DriverView {
    fn from(snapshot: DriverSnapshot) -> Self {
        Self {
            driver_id: snapshot.driver_id,
            username: snapshot.username,
            latitude: snapshot.latitude,
            longitude: snapshot.longitude,
            last_update: snapshot.last_update,
        }
    }
}

/// Active driver session
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DriverSummaryView {
    pub driver_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<DriverSummary> for DriverSummaryView {
    fn from(summary: DriverSummary) -> Self {
        Self {
            driver_id: summary.driver_id,
            username: summary.username,
            created_at: summary.created_at,
        }
    }
}

/// All active drivers joined with their latest position
#[utoipa::path(
    get,
    path = "/api/all-drivers",
    tag = "drivers",
    responses(
        (status = 200, description = "Active drivers, most recently updated first", body = Vec<DriverView>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn all_drivers(
    Extension(tracking): Extension<Arc<TrackingService>>,
) -> Result<Json<Vec<DriverView>>, ApiError> {
    let drivers = tracking
        .store()
        .active_drivers_with_locations()
        .await
        .map_err(|e| ApiError::from_tracking(e, "Failed to load drivers"))?;

    Ok(Json(drivers.into_iter().map(DriverView::from).collect()))
}

/// Active driver sessions
#[utoipa::path(
    get,
    path = "/api/drivers",
    tag = "drivers",
    responses(
        (status = 200, description = "Active driver sessions, newest first", body = Vec<DriverSummaryView>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn active_drivers(
    Extension(tracking): Extension<Arc<TrackingService>>,
) -> Result<Json<Vec<DriverSummaryView>>, ApiError> {
    let drivers = tracking
        .store()
        .active_drivers()
        .await
        .map_err(|e| ApiError::from_tracking(e, "Failed to load drivers"))?;

    Ok(Json(drivers.into_iter().map(DriverSummaryView::from).collect()))
}

/// Latest position of a driver, `null` if none was reported
#[utoipa::path(
    get,
    path = "/api/driver-location/{driver_id}",
    tag = "drivers",
    params(("driver_id" = String, Path, description = "Driver session id")),
    responses(
        (status = 200, description = "Latest location, or null when none was reported", body = LocationView),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn driver_location(
    Extension(tracking): Extension<Arc<TrackingService>>,
    Path(driver_id): Path<String>,
) -> Result<Json<Option<LocationView>>, ApiError> {
    let location = tracking
        .store()
        .latest_location(&driver_id)
        .await
        .map_err(|e| ApiError::from_tracking(e, "Failed to load driver location"))?;

    Ok(Json(location.map(LocationView::from)))
}

/// Create driver routes
pub fn drivers_routes() -> Router {
    Router::new()
        .route("/api/all-drivers", get(all_drivers))
        .route("/api/drivers", get(active_drivers))
        .route("/api/driver-location/:driver_id", get(driver_location))
}
