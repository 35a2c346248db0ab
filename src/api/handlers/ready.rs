// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::extract::State;
use std::sync::Arc;

use crate::api::AppState;

/// GET /ready
///
/// Readiness probe for load balancers and orchestrators. Always answers
/// `200 ok` as `text/plain`; it only proves the process can serve HTTP.
pub async fn ready(State(state): State<Arc<AppState>>) -> &'static str {
    state.metrics.record_ready_probe();
    "ok"
}
