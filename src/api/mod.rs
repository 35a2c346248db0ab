// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! HTTP API module for the wise backend
//!
//! # Endpoints
//! - `GET /ready` — readiness probe, plain `ok`
//! - `GET /health` — health check with version
//! - `GET /metrics` — Prometheus metrics
//!
//! Every route, and the 404 fallback, sits behind the CORS middleware.

pub mod handlers;
mod state;

use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::cors::cors_middleware;

pub use state::AppState;

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ready", get(handlers::ready))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors_middleware))
        .with_state(state)
}
