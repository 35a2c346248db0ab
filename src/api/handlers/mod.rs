// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod fallback;
mod health;
mod metrics;
mod ready;

pub use fallback::not_found;
pub use health::health_check;
pub use metrics::metrics_handler;
pub use ready::ready;
