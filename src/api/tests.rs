//! Router tests driven through `tower::ServiceExt::oneshot`

use super::app_router;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use convoy_core::{EventBus, TrackingConfig, TrackingService, TrackingStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn tracking(max_links: usize) -> Arc<TrackingService> {
    let store = Arc::new(TrackingStore::in_memory().await.unwrap());
    Arc::new(TrackingService::new(
        store,
        EventBus::new(16),
        TrackingConfig::new("convoy_bot").with_max_generated_links(max_links),
    ))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_generate_link() {
    let tracking = tracking(10).await;
    let (status, body) = get_json(app_router(tracking.clone()), "/generate-link").await;

    assert_eq!(status, StatusCode::OK);
    let driver_id = body["driver_id"].as_str().unwrap();
    assert_eq!(driver_id.len(), 36);
    assert_eq!(
        body["tracking_link"],
        format!("https://t.me/convoy_bot?start={}", driver_id)
    );
    assert_eq!(
        body["instructions"],
        "Send this link to your driver. They need to click it and start sharing location."
    );
    assert_eq!(tracking.store().pending_session_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_generate_link_limit() {
    let tracking = tracking(1).await;
    let (status, _) = get_json(app_router(tracking.clone()), "/generate-link").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(app_router(tracking), "/generate-link").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_all_drivers() {
    let tracking = tracking(10).await;
    let located = tracking.issue_link().await.unwrap();
    let silent = tracking.issue_link().await.unwrap();

    tracking
        .register_driver(&located.driver_id, 42, "alice")
        .await
        .unwrap();
    tracking
        .record_location(&located.driver_id, 40.7, -74.0, Utc::now())
        .await
        .unwrap();

    let (status, body) = get_json(app_router(tracking), "/api/all-drivers").await;
    assert_eq!(status, StatusCode::OK);

    let drivers = body.as_array().unwrap();
    assert_eq!(drivers.len(), 2);
    assert_eq!(drivers[0]["driver_id"], located.driver_id.as_str());
    assert_eq!(drivers[0]["username"], "alice");
    assert_eq!(drivers[0]["latitude"], 40.7);
    assert_eq!(drivers[1]["driver_id"], silent.driver_id.as_str());
    assert_eq!(drivers[1]["username"], "Unknown");
    assert!(drivers[1]["latitude"].is_null());
    assert!(drivers[1]["last_update"].is_null());
}

#[tokio::test]
async fn test_driver_location() {
    let tracking = tracking(10).await;
    let link = tracking.issue_link().await.unwrap();
    let uri = format!("/api/driver-location/{}", link.driver_id);

    let (status, body) = get_json(app_router(tracking.clone()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    tracking
        .record_location(&link.driver_id, 1.5, 2.5, Utc::now())
        .await
        .unwrap();

    let (_, body) = get_json(app_router(tracking), &uri).await;
    assert_eq!(body["latitude"], 1.5);
    assert_eq!(body["longitude"], 2.5);
}

#[tokio::test]
async fn test_active_drivers() {
    let tracking = tracking(10).await;
    let link = tracking.issue_link().await.unwrap();

    let (status, body) = get_json(app_router(tracking), "/api/drivers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["driver_id"], link.driver_id.as_str());
    assert!(body[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app_router(tracking(10).await), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "driver-tracking-web");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["pending_links"], 0);
}

#[tokio::test]
async fn test_health_counts_pending_links() {
    let tracking = tracking(10).await;
    tracking.issue_link().await.unwrap();
    tracking.issue_link().await.unwrap();

    let (_, body) = get_json(app_router(tracking), "/health").await;
    assert_eq!(body["pending_links"], 2);
}

#[tokio::test]
async fn test_openapi_document() {
    let (status, body) = get_json(app_router(tracking(10).await), "/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/generate-link"].is_object());
    assert!(body["paths"]["/api/all-drivers"].is_object());
}
