// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Application state shared across HTTP handlers and middleware

use crate::config::Config;
use crate::cors::CorsRegistry;
use crate::error::Result;
use crate::metrics::MetricsRegistry;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub cors: CorsRegistry,
    pub metrics: MetricsRegistry,
}

impl AppState {
    /// Compiles the configured CORS policies into the shared registry
    pub fn new(config: Config, metrics: MetricsRegistry) -> Result<Self> {
        let cors = CorsRegistry::new(&config.cors_policies, config.cors_resolution)?;
        Ok(AppState {
            config,
            cors,
            metrics,
        })
    }
}
