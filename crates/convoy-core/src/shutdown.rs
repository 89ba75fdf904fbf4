//! Graceful Shutdown
//!
//! Provides coordinated shutdown across the HTTP server, the bot dispatcher
//! and the per-driver auto-tracking loops.
//!
//! ## Usage
//!
//! ```ignore
//! let shutdown = ShutdownController::new();
//!
//! // Give tokens to components
//! let token = shutdown.token();
//! component.run(token).await;
//!
//! // Trigger shutdown
//! shutdown.shutdown();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Shutdown controller for coordinating graceful shutdown
#[derive(Debug)]
pub struct ShutdownController {
    cancel_token: CancellationToken,
    shutdown_initiated: AtomicBool,
}

impl ShutdownController {
    /// Create a new shutdown controller
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            cancel_token: CancellationToken::new(),
            shutdown_initiated: AtomicBool::new(false),
        })
    }

    /// Get a cancellation token for a component
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Cancel every token handed out by this controller. Idempotent.
    pub fn shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Shutdown already initiated");
            return;
        }

        info!("Initiating graceful shutdown...");
        self.cancel_token.cancel();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

/// Shutdown signal future that integrates with ShutdownController
pub async fn shutdown_signal_with_controller(controller: Arc<ShutdownController>) {
    tokio::select! {
        _ = wait_for_shutdown_signal() => controller.shutdown(),
        _ = controller.cancel_token.cancelled() => {}
    }
}
