//! Server initialization and main run loop
//!
//! Contains the main `run()` function that starts all server components.

use super::channel_starters::start_telegram_adapter;
use super::config::AppConfig;
use super::loader::load_config;
use super::validation::{validate_production_config, validate_required};
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use convoy_core::{
    shutdown_signal_with_controller, EventBus, ShutdownController, TrackingConfig,
    TrackingService, TrackingStore,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

/// Run the server
pub async fn run(no_bot: bool) -> Result<()> {
    info!("Starting Convoy v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");

    let run_bot = config.telegram.enabled && !no_bot;
    validate_required(&config, run_bot)?;
    validate_production_config(&config);

    let shutdown_controller = ShutdownController::new();

    let store = TrackingStore::from_path(Path::new(&config.database.path))
        .await
        .context("Failed to initialize SQLite tracking store")?;
    info!("Database: {}", config.database.path);

    let tracking = Arc::new(build_tracking_service(&config, store));
    info!(capacity = config.events.capacity, "Event bus initialized");

    let mut channel_handles = Vec::new();
    if run_bot {
        if let Some(handle) = start_telegram_adapter(&config, &tracking, &shutdown_controller) {
            channel_handles.push(handle);
        }
    } else {
        info!("Telegram bot disabled; serving dashboard only");
    }

    let app = with_web_ui(
        crate::api::app_router(tracking.clone()),
        Path::new(&config.server.web_ui_dir),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    let server_shutdown = shutdown_controller.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_with_controller(server_shutdown))
        .await
        .context("HTTP server error")?;

    // Signal may have arrived through the server; make sure channels see it
    shutdown_controller.shutdown();

    info!("Waiting for channel adapters to finish...");
    let adapter_timeout = tokio::time::Duration::from_secs(5);
    for handle in channel_handles {
        match tokio::time::timeout(adapter_timeout, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Channel adapter task error: {}", e),
            Err(_) => warn!("Channel adapter shutdown timeout, aborting"),
        }
    }

    info!("Convoy shutdown complete");
    Ok(())
}

fn build_tracking_service(config: &AppConfig, store: TrackingStore) -> TrackingService {
    let tracking_config = TrackingConfig::new(config.telegram.username().unwrap_or_default())
        .with_max_generated_links(config.tracking.max_generated_links);

    TrackingService::new(
        Arc::new(store),
        EventBus::new(config.events.capacity),
        tracking_config,
    )
}

/// Serve the dashboard bundle when built, otherwise a plain banner at `/`
fn with_web_ui(app: Router, web_ui_dir: &Path) -> Router {
    if web_ui_dir.exists() {
        info!("Web UI enabled: serving from {}", web_ui_dir.display());
        // Static files, falling back to index.html for client-side routes
        let serve_dir = ServeDir::new(web_ui_dir)
            .append_index_html_on_directories(true)
            .fallback(ServeFile::new(web_ui_dir.join("index.html")));
        app.fallback_service(serve_dir)
    } else {
        warn!(
            "Web UI bundle not found at {}; build apps/web with trunk",
            web_ui_dir.display()
        );
        app.route("/", get(|| async { "Convoy driver tracking server" }))
    }
}
