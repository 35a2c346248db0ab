// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the wise backend
//!
//! Loads configuration from environment variables, falling back to the
//! compiled-in CORS policies when none are supplied.

use crate::cors::{CorsPolicy, PolicyResolution};
use crate::error::{AppError, Result};


/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "0.0.0.0:8080";

    /// Origin served by the frontend Nginx
    pub const FRONTEND_ORIGIN: &str = "http://49.246.62.220:2000";
    /// Browsers behind the proxy may present any origin
    pub const ANY_ORIGIN_PATTERN: &str = "*";

    pub const CORS_MAPPING: &str = "/**";
    pub const CORS_ALLOWED_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "OPTIONS"];
    pub const CORS_ALLOWED_HEADERS: &str = "*";
    pub const CORS_ALLOW_CREDENTIALS: bool = false;
    pub const CORS_MAX_AGE_SECS: u64 = 3600;
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const CORS_POLICIES: &str = "CORS_POLICIES";
    pub const CORS_RESOLUTION: &str = "CORS_RESOLUTION";
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    /// Policies in registration order
    pub cors_policies: Vec<CorsPolicy>,
    pub cors_resolution: PolicyResolution,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: defaults::SERVER_ADDR.to_string(),
            cors_policies: default_policies(),
            cors_resolution: PolicyResolution::default(),
        }
    }
}

/// The two built-in registrations: the frontend origin first, then the
/// permit-all pattern
pub fn default_policies() -> Vec<CorsPolicy> {
    vec![
        CorsPolicy::exact(defaults::FRONTEND_ORIGIN),
        CorsPolicy::pattern(defaults::ANY_ORIGIN_PATTERN),
    ]
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr =
            lookup(env_vars::SERVER_ADDR).unwrap_or_else(|| defaults::SERVER_ADDR.to_string());

        let cors_policies = match lookup(env_vars::CORS_POLICIES) {
            Some(json) => serde_json::from_str::<Vec<CorsPolicy>>(&json).map_err(|e| {
                AppError::Config(format!("Failed to parse {}: {e}", env_vars::CORS_POLICIES))
            })?,
            None => default_policies(),
        };

        let cors_resolution = match lookup(env_vars::CORS_RESOLUTION) {
            Some(value) => value.parse::<PolicyResolution>().map_err(AppError::Config)?,
            None => PolicyResolution::default(),
        };

        if cors_policies.is_empty() {
            tracing::warn!("No CORS policies configured. Cross-origin requests will not be granted.");
        }

        for (index, policy) in cors_policies.iter().enumerate() {
            policy
                .validate()
                .map_err(|e| AppError::Config(format!("CORS policy #{index}: {e}")))?;
        }

        Ok(Config {
            server_addr,
            cors_policies,
            cors_resolution,
        })
    }
}
