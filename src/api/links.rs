//! Tracking link endpoint
//!
//! GET /generate-link - Create a driver session and its Telegram deep link

use axum::{routing::get, Extension, Json, Router};
use convoy_core::{GeneratedLink, TrackingService};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::error::{ApiError, ErrorBody};

/// Newly issued tracking link
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneratedLinkView {
    pub driver_id: String,
    /// `https://t.me/<bot>?start=<driver_id>`
    pub tracking_link: String,
    pub instructions: String,
}

impl From<GeneratedLink> for GeneratedLinkView {
    fn from(link: GeneratedLink) -> Self {
        Self {
            driver_id: link.driver_id,
            tracking_link: link.tracking_link,
            instructions: link.instructions,
        }
    }
}

/// Issue a new tracking link
#[utoipa::path(
    get,
    path = "/generate-link",
    tag = "links",
    responses(
        (status = 200, description = "New driver session", body = GeneratedLinkView),
        (status = 429, description = "Too many unclaimed links", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn generate_link(
    Extension(tracking): Extension<Arc<TrackingService>>,
) -> Result<Json<GeneratedLinkView>, ApiError> {
    let link = tracking
        .issue_link()
        .await
        .map_err(|e| ApiError::from_tracking(e, "Failed to generate tracking link"))?;

    Ok(Json(link.into()))
}

/// Create link routes
pub fn links_routes() -> Router {
    Router::new().route("/generate-link", get(generate_link))
}
