//! Driver and location storage using SQLite
//!
//! Persists driver sessions created from tracking links and every location
//! a driver reports, so the dashboard can be rebuilt after a restart.

mod migrations;
mod queries;


use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;

/// SQLite-based tracking store
#[derive(Clone)]
pub struct TrackingStore {
    pub(super) pool: Pool<Sqlite>,
}

impl TrackingStore {
    /// Create a new store from database path
    pub async fn from_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Concurrent writers wait for the lock instead of failing
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        debug!(path = %path.display(), "Opened tracking database");

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create an in-memory store (single connection so every query sees the same database)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Round-trip a trivial query, used by the health endpoint
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
