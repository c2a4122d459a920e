//! # Membership Gateway Server
//!
//! Standalone HTTP server for the membership gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin membership-server
//!
//! # Run with a specific environment and credentials from the environment
//! MEMBERSHIP_ENV=production MEMBERSHIP__STRIPE__SECRET_KEY=sk_live_... cargo run --bin membership-server
//! ```

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use membership_gateway::bootstrap::GatewayBootstrap;
use membership_gateway::config::ConfigManager;
use membership_gateway::logging;
use membership_gateway::web::create_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside local development
    dotenvy::dotenv().ok();

    logging::init_tracing();

    info!("Starting Membership Gateway Server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );

    let manager = ConfigManager::load().context("failed to load configuration")?;
    info!("   Environment: {}", manager.environment());
    info!(config = %manager.sanitized(), "Configuration loaded");

    let state = GatewayBootstrap::build_state(&manager).context("failed to build gateway")?;
    let server = &manager.config().server;
    let app = create_app(state, server.request_timeout());

    let listener = GatewayBootstrap::bind_listener(&manager)
        .await
        .with_context(|| format!("failed to bind {}", server.bind_address))?;

    info!("Gateway listening on {}", server.bind_address);
    info!("   Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Membership Gateway shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
