//! Tracking service
//!
//! Ties the store to the event bus: every state change that the dashboard
//! should see live is persisted first and published second.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::event_bus::{EventBus, TrackingEvent};
use crate::store::TrackingStore;
use crate::types::{GeneratedLink, Location};

/// Instructions returned alongside every generated link
pub const LINK_INSTRUCTIONS: &str =
    "Send this link to your driver. They need to click it and start sharing location.";

/// Tracking service configuration
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    /// Telegram bot username used to build deep links
    pub bot_username: String,
    /// Maximum number of unclaimed links (0 = unlimited)
    pub max_generated_links: usize,
}

impl TrackingConfig {
    /// Create a config for the given bot
    #[must_use]
    pub fn new(bot_username: impl Into<String>) -> Self {
        Self {
            bot_username: bot_username.into(),
            max_generated_links: 100,
        }
    }

    /// Set the unclaimed-link cap
    #[must_use]
    pub fn with_max_generated_links(mut self, max: usize) -> Self {
        self.max_generated_links = max;
        self
    }
}

/// Reject coordinates outside the WGS84 range
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidCoordinates {
            latitude,
            longitude,
        })
    }
}

/// Driver tracking service shared by the HTTP API and the bot
pub struct TrackingService {
    store: Arc<TrackingStore>,
    event_bus: EventBus,
    config: TrackingConfig,
}

impl TrackingService {
    /// Create a new service
    #[must_use]
    pub fn new(store: Arc<TrackingStore>, event_bus: EventBus, config: TrackingConfig) -> Self {
        Self {
            store,
            event_bus,
            config,
        }
    }

    /// Underlying store
    #[must_use]
    pub fn store(&self) -> &Arc<TrackingStore> {
        &self.store
    }

    /// Event bus the service publishes to
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Deep link that opens the bot with `/start <driver_id>`
    #[must_use]
    pub fn tracking_link(&self, driver_id: &str) -> String {
        format!(
            "https://t.me/{}?start={}",
            self.config.bot_username, driver_id
        )
    }

    /// Create a new driver session and return its shareable link
    pub async fn issue_link(&self) -> Result<GeneratedLink> {
        let limit = self.config.max_generated_links;
        let driver_id = Uuid::new_v4().to_string();

        if !self.store.create_driver_session(&driver_id, limit).await? {
            warn!(limit, "Tracking link limit reached");
            return Err(Error::LinkLimitReached { limit });
        }
        info!(driver_id = %driver_id, "Issued tracking link");

        Ok(GeneratedLink {
            tracking_link: self.tracking_link(&driver_id),
            driver_id,
            instructions: LINK_INSTRUCTIONS.to_string(),
        })
    }

    /// Bind a Telegram user to a session. Returns `false` for unknown sessions.
    pub async fn register_driver(
        &self,
        driver_id: &str,
        telegram_user_id: i64,
        username: &str,
    ) -> Result<bool> {
        let registered = self
            .store
            .register_driver(driver_id, telegram_user_id, username)
            .await?;

        if registered {
            info!(driver_id = %driver_id, telegram_user_id, "Driver registered");
            self.event_bus.publish(TrackingEvent::DriverRegistered {
                driver_id: driver_id.to_string(),
                username: username.to_string(),
            });
        } else {
            debug!(driver_id = %driver_id, "Registration for unknown session");
        }

        Ok(registered)
    }

    /// Stop tracking a driver
    pub async fn deactivate(&self, driver_id: &str) -> Result<bool> {
        let changed = self.store.deactivate_driver(driver_id).await?;
        if changed {
            info!(driver_id = %driver_id, "Driver deactivated");
            self.event_bus.publish(TrackingEvent::DriverDeactivated {
                driver_id: driver_id.to_string(),
            });
        }
        Ok(changed)
    }

    /// Persist a position and push it to live subscribers
    pub async fn record_location(
        &self,
        driver_id: &str,
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Location> {
        validate_coordinates(latitude, longitude)?;

        let location = Location {
            latitude,
            longitude,
            timestamp,
        };
        self.store.store_location(driver_id, &location).await?;

        let receivers = self.event_bus.publish(TrackingEvent::LocationUpdate {
            driver_id: driver_id.to_string(),
            location,
        });
        debug!(driver_id = %driver_id, receivers, "Location recorded");

        Ok(location)
    }

    /// Record a position reported by a Telegram user.
    ///
    /// Returns `None` when the user is not bound to an active session.
    pub async fn record_location_for_user(
        &self,
        telegram_user_id: i64,
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<(String, Location)>> {
        let Some(binding) = self.store.driver_by_telegram_user(telegram_user_id).await? else {
            debug!(telegram_user_id, "Location from unregistered user ignored");
            return Ok(None);
        };

        let location = self
            .record_location(&binding.driver_id, latitude, longitude, timestamp)
            .await?;
        Ok(Some((binding.driver_id, location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service(max_links: usize) -> TrackingService {
        let store = Arc::new(TrackingStore::in_memory().await.unwrap());
        TrackingService::new(
            store,
            EventBus::new(16),
            TrackingConfig::new("convoy_bot").with_max_generated_links(max_links),
        )
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[tokio::test]
    async fn test_issue_link() {
        let svc = service(10).await;
        let link = svc.issue_link().await.unwrap();

        assert!(Uuid::parse_str(&link.driver_id).is_ok());
        assert_eq!(
            link.tracking_link,
            format!("https://t.me/convoy_bot?start={}", link.driver_id)
        );
        assert_eq!(link.instructions, LINK_INSTRUCTIONS);
        assert_eq!(svc.store().pending_session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_link_limit_counts_only_unclaimed_sessions() {
        let svc = service(2).await;
        let first = svc.issue_link().await.unwrap();
        svc.issue_link().await.unwrap();

        assert!(matches!(
            svc.issue_link().await,
            Err(Error::LinkLimitReached { limit: 2 })
        ));

        svc.register_driver(&first.driver_id, 5, "frank").await.unwrap();
        assert!(svc.issue_link().await.is_ok());
    }

    #[tokio::test]
    async fn test_unlimited_links() {
        let svc = service(0).await;
        for _ in 0..5 {
            svc.issue_link().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_record_location_publishes_update() {
        let svc = service(10).await;
        let link = svc.issue_link().await.unwrap();
        assert!(svc.register_driver(&link.driver_id, 11, "gina").await.unwrap());

        let mut rx = svc.event_bus().subscribe();
        let recorded = svc
            .record_location_for_user(11, 40.7, -74.0, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(recorded.0, link.driver_id);

        match rx.recv().await.unwrap() {
            TrackingEvent::LocationUpdate {
                driver_id,
                location,
            } => {
                assert_eq!(driver_id, link.driver_id);
                assert_eq!(location.latitude, 40.7);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let latest = svc.store().latest_location(&link.driver_id).await.unwrap();
        assert_eq!(latest.map(|l| l.longitude), Some(-74.0));
    }

    #[tokio::test]
    async fn test_unregistered_user_is_ignored() {
        let svc = service(10).await;
        let mut rx = svc.event_bus().subscribe();

        let result = svc
            .record_location_for_user(99, 1.0, 1.0, Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_location_not_stored() {
        let svc = service(10).await;
        let link = svc.issue_link().await.unwrap();

        let result = svc
            .record_location(&link.driver_id, 123.0, 0.0, Utc::now())
            .await;
        assert!(matches!(result, Err(Error::InvalidCoordinates { .. })));
        assert!(svc
            .store()
            .latest_location(&link.driver_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_deactivate_publishes_once() {
        let svc = service(10).await;
        let link = svc.issue_link().await.unwrap();
        let mut rx = svc.event_bus().subscribe();

        assert!(svc.deactivate(&link.driver_id).await.unwrap());
        assert!(matches!(
            rx.recv().await.unwrap(),
            TrackingEvent::DriverDeactivated { .. }
        ));

        assert!(!svc.deactivate(&link.driver_id).await.unwrap());
        assert!(rx.try_recv().is_err());
    }
}
