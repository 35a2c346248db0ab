// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wise_backend::{AppState, Config, MetricsRegistry, Result, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    setup_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    tracing::info!(
        "Loaded {} CORS policy registration(s), resolution {}",
        config.cors_policies.len(),
        config.cors_resolution
    );
    for policy in &config.cors_policies {
        tracing::info!(
            "  - {} origin '{}' methods [{}] credentials={} max-age={}s",
            policy.mapping,
            policy.origin,
            policy.allowed_methods.join(","),
            policy.allow_credentials,
            policy.max_age_secs
        );
    }

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let state = Arc::new(AppState::new(config, MetricsRegistry::new())?);

    // Graceful shutdown channel
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("Wise backend starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /ready   - Readiness probe");
    tracing::info!("  - GET /health  - Health check");
    tracing::info!("  - GET /metrics - Prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    Ok(())
}

fn setup_tracing() {
    // RUST_LOG wins; otherwise "info"
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
