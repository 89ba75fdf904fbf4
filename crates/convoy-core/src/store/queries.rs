use super::TrackingStore;
use crate::error::Result;
use crate::types::{DriverBinding, DriverSnapshot, DriverSummary, Location, UNKNOWN_USERNAME};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(FromRow)]
struct LocationRow {
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
}

#[derive(FromRow)]
struct DriverRow {
    driver_id: String,
    username: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SnapshotRow {
    driver_id: String,
    username: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    last_update: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct BindingRow {
    driver_id: String,
    username: Option<String>,
}

fn display_name(username: Option<String>) -> String {
    username
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_string())
}

impl TrackingStore {
    /// Create (or reset) an active driver session for a freshly issued link.
    ///
    /// The insert only happens while fewer than `max_pending` unclaimed
    /// sessions exist (`0` lifts the cap); the count and the insert run as
    /// one statement. Returns `false` when the cap stopped the insert.
    pub async fn create_driver_session(
        &self,
        driver_id: &str,
        max_pending: usize,
    ) -> Result<bool> {
        let max_pending = i64::try_from(max_pending).unwrap_or(i64::MAX);

        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO drivers (driver_id, is_active, created_at)
            SELECT ?, TRUE, ?
            WHERE ? = 0
               OR (SELECT COUNT(*) FROM drivers
                   WHERE is_active = TRUE AND telegram_user_id IS NULL) < ?
            "#,
        )
        .bind(driver_id)
        .bind(Utc::now())
        .bind(max_pending)
        .bind(max_pending)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bind a Telegram user to an existing session.
    ///
    /// Returns `false` when no session exists for `driver_id`.
    pub async fn register_driver(
        &self,
        driver_id: &str,
        telegram_user_id: i64,
        username: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE drivers
            SET telegram_user_id = ?, username = ?, is_active = TRUE
            WHERE driver_id = ?
            "#,
        )
        .bind(telegram_user_id)
        .bind(username)
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a location report
    pub async fn store_location(&self, driver_id: &str, location: &Location) -> Result<()> {
        sqlx::query(
            "INSERT INTO locations (driver_id, latitude, longitude, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(driver_id)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent location of a driver
    pub async fn latest_location(&self, driver_id: &str) -> Result<Option<Location>> {
        let row: Option<LocationRow> = sqlx::query_as(
            r#"
            SELECT latitude, longitude, timestamp
            FROM locations
            WHERE driver_id = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Location {
            latitude: r.latitude,
            longitude: r.longitude,
            timestamp: r.timestamp,
        }))
    }

    /// All active drivers, newest session first
    pub async fn active_drivers(&self) -> Result<Vec<DriverSummary>> {
        let rows: Vec<DriverRow> = sqlx::query_as(
            r#"
            SELECT driver_id, username, created_at
            FROM drivers
            WHERE is_active = TRUE
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DriverSummary {
                driver_id: r.driver_id,
                username: display_name(r.username),
                created_at: r.created_at,
            })
            .collect())
    }

    /// All active drivers joined with their latest location.
    ///
    /// Drivers that never reported a location are included with null
    /// coordinates and sort after those that did.
    pub async fn active_drivers_with_locations(&self) -> Result<Vec<DriverSnapshot>> {
        let rows: Vec<SnapshotRow> = sqlx::query_as(
            r#"
            SELECT d.driver_id AS driver_id,
                   d.username AS username,
                   l.latitude AS latitude,
                   l.longitude AS longitude,
                   l.timestamp AS last_update
            FROM drivers d
            LEFT JOIN (
                SELECT driver_id, latitude, longitude, timestamp,
                       ROW_NUMBER() OVER (
                           PARTITION BY driver_id ORDER BY timestamp DESC, id DESC
                       ) AS rn
                FROM locations
            ) l ON d.driver_id = l.driver_id AND l.rn = 1
            WHERE d.is_active = TRUE
            ORDER BY l.timestamp DESC, d.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DriverSnapshot {
                driver_id: r.driver_id,
                username: display_name(r.username),
                latitude: r.latitude,
                longitude: r.longitude,
                last_update: r.last_update,
            })
            .collect())
    }

    /// Active driver session bound to a Telegram user (most recent wins)
    pub async fn driver_by_telegram_user(
        &self,
        telegram_user_id: i64,
    ) -> Result<Option<DriverBinding>> {
        let row: Option<BindingRow> = sqlx::query_as(
            r#"
            SELECT driver_id, username
            FROM drivers
            WHERE telegram_user_id = ? AND is_active = TRUE
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(telegram_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| DriverBinding {
            driver_id: r.driver_id,
            username: r.username,
        }))
    }

    /// Mark a driver inactive. Returns whether a row changed.
    pub async fn deactivate_driver(&self, driver_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE drivers SET is_active = FALSE WHERE driver_id = ? AND is_active = TRUE",
        )
        .bind(driver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Active sessions whose link has not been claimed by a Telegram user
    pub async fn pending_session_count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM drivers WHERE is_active = TRUE AND telegram_user_id IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}
