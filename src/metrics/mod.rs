// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prometheus metrics for probe traffic and CORS decisions

mod labels;
mod registry;


/// Label sets
pub use labels::CorsLabels;

/// Prometheus metrics registry
pub use registry::MetricsRegistry;
