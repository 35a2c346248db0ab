// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! ```rust
//! use wise_backend::prelude::*;
//! ```

// Core types
pub use crate::api::{AppState, create_router};
pub use crate::config::Config;
pub use crate::error::{AppError, Result};

// CORS
pub use crate::cors::{CorsPolicy, CorsRegistry, OriginMatcher, PolicyResolution};

// Metrics
pub use crate::metrics::MetricsRegistry;
