use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::api::AppState;

/// Health report: build version plus the CORS registry in effect
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cors_policies: usize,
    pub cors_resolution: String,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cors_policies: state.cors.len(),
        cors_resolution: state.cors.resolution().to_string(),
    })
}
