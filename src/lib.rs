// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # Wise Backend
//!
//! Readiness probe and cross-origin access policy for the wise application
//! backend.
//!
//! ## Main modules
//! - `api`: HTTP router, state and handlers
//! - `config`: configuration management
//! - `cors`: CORS policies, resolution and middleware
//! - `error`: error types
//! - `metrics`: Prometheus registry
//! - `prelude`: commonly used types and traits

mod api;
mod config;
mod cors;
mod error;
mod metrics;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, default_policies, defaults, env_vars};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP API router and state
pub use api::{AppState, create_router};

/// CORS policies and evaluation
pub use cors::{
    CorsGrant, CorsPolicy, CorsRegistry, CorsRequest, OriginMatcher, PathMapping,
    PolicyResolution, RequestKind, cors_middleware,
};

/// Metrics registry and labels
pub use metrics::{CorsLabels, MetricsRegistry};
