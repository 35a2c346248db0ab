// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update logic

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::metrics::labels::{BuildInfoLabels, CorsLabels};

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Mutex<Registry>>,
    ready_probes: Counter,
    cors_decisions: Family<CorsLabels, Counter>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        // Counter names get the `_total` suffix on encode
        let ready_probes = Counter::default();
        registry.register(
            "ready_probes",
            "Requests answered by the readiness probe",
            ready_probes.clone(),
        );
        let cors_decisions = Family::<CorsLabels, Counter>::default();
        registry.register(
            "cors_decisions",
            "Cross-origin requests by kind and outcome",
            cors_decisions.clone(),
        );
        let build_info = Family::<BuildInfoLabels, Gauge>::default();
        registry.register(
            "wise_backend_build_info",
            "Build information (always 1)",
            build_info.clone(),
        );

        build_info
            .get_or_create(&BuildInfoLabels {
                version: env!("CARGO_PKG_VERSION").to_string(),
            })
            .set(1);

        MetricsRegistry {
            registry: Arc::new(Mutex::new(registry)),
            ready_probes,
            cors_decisions,
        }
    }

    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry)?;
        Ok(buffer)
    }

    pub fn record_ready_probe(&self) {
        self.ready_probes.inc();
    }

    pub fn record_cors_decision(&self, labels: &CorsLabels) {
        self.cors_decisions.get_or_create(labels).inc();
    }

    pub fn ready_probe_count(&self) -> u64 {
        self.ready_probes.get()
    }

    pub fn cors_decision_count(&self, labels: &CorsLabels) -> u64 {
        self.cors_decisions
            .get(labels)
            .map(|counter| counter.get())
            .unwrap_or(0)
    }
}
