use super::*;
use chrono::{TimeZone, Utc};
use convoy_core::{Location, TrackingEvent};

#[test]
fn test_ping() {
    let response = handle_client_message(r#"{"type":"ping"}"#);
    assert!(matches!(response, EventNotification::Pong));
}

#[test]
fn test_malformed_message() {
    let response = handle_client_message("not json");
    match response {
        EventNotification::Error { code, .. } => {
            assert_eq!(code.as_deref(), Some("INVALID_MESSAGE"));
        }
        other => panic!("Expected Error, got {:?}", other),
    }

    let response = handle_client_message(r#"{"type":"subscribe"}"#);
    assert!(matches!(response, EventNotification::Error { .. }));
}

#[test]
fn test_location_update_frame() {
    let event = TrackingEvent::LocationUpdate {
        driver_id: "abc".to_string(),
        location: Location {
            latitude: 51.5,
            longitude: -0.12,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        },
    };

    let json = serde_json::to_value(EventNotification::from(event)).unwrap();
    assert_eq!(json["type"], "location_update");
    assert_eq!(json["driver_id"], "abc");
    assert_eq!(json["location"]["latitude"], 51.5);
    assert_eq!(json["location"]["longitude"], -0.12);
    assert_eq!(json["location"]["timestamp"], "2024-05-01T12:00:00Z");
}

#[test]
fn test_registration_frames() {
    let json = serde_json::to_value(EventNotification::from(TrackingEvent::DriverRegistered {
        driver_id: "abc".to_string(),
        username: "alice".to_string(),
    }))
    .unwrap();
    assert_eq!(json["type"], "driver_registered");
    assert_eq!(json["username"], "alice");

    let json = serde_json::to_value(EventNotification::from(
        TrackingEvent::DriverDeactivated {
            driver_id: "abc".to_string(),
        },
    ))
    .unwrap();
    assert_eq!(json["type"], "driver_deactivated");
    assert_eq!(json["driver_id"], "abc");
}

#[test]
fn test_connected_frame() {
    let session_id = Uuid::new_v4();
    let json = serde_json::to_value(EventNotification::Connected { session_id }).unwrap();
    assert_eq!(json["type"], "connected");
    assert_eq!(json["session_id"], session_id.to_string());
}
