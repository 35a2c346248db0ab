// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Declarative CORS policy as loaded from configuration

use axum::http::Method;
use serde::Deserialize;

use crate::config::defaults;
use crate::cors::matcher::OriginMatcher;

/// One registered cross-origin policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorsPolicy {
    #[serde(default = "default_mapping")]
    pub mapping: String,
    pub origin: OriginMatcher,
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

fn default_mapping() -> String {
    defaults::CORS_MAPPING.to_string()
}

fn default_methods() -> Vec<String> {
    defaults::CORS_ALLOWED_METHODS
        .iter()
        .map(|m| (*m).to_string())
        .collect()
}

fn default_headers() -> Vec<String> {
    vec![defaults::CORS_ALLOWED_HEADERS.to_string()]
}

fn default_max_age() -> u64 {
    defaults::CORS_MAX_AGE_SECS
}

impl CorsPolicy {
    /// Policy granting exactly one origin, with default methods and headers
    pub fn exact(origin: impl Into<String>) -> Self {
        Self::with_origin(OriginMatcher::Exact(origin.into()))
    }

    /// Policy granting every origin matched by a wildcard pattern
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::with_origin(OriginMatcher::Pattern(pattern.into()))
    }

    fn with_origin(origin: OriginMatcher) -> Self {
        CorsPolicy {
            mapping: default_mapping(),
            origin,
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            allow_credentials: defaults::CORS_ALLOW_CREDENTIALS,
            max_age_secs: default_max_age(),
        }
    }

    /// True when the header list contains the `*` wildcard
    pub fn allows_any_header(&self) -> bool {
        self.allowed_headers.iter().any(|h| h.trim() == "*")
    }

    /// Validates policy configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.mapping.starts_with('/') {
            return Err(format!(
                "Invalid mapping '{}': expected a path starting with '/'",
                self.mapping
            ));
        }

        match &self.origin {
            OriginMatcher::Exact(origin) if origin.trim().is_empty() => {
                return Err("Allowed origin cannot be empty".to_string());
            }
            OriginMatcher::Exact(origin) if origin.trim() == "*" => {
                return Err(
                    "Exact origin cannot be '*': use a pattern to allow any origin".to_string(),
                );
            }
            OriginMatcher::Pattern(pattern) if pattern.trim().is_empty() => {
                return Err("Allowed origin pattern cannot be empty".to_string());
            }
            _ => {}
        }

        // Browsers refuse credentialed responses for wildcard origins
        if self.allow_credentials && matches!(self.origin, OriginMatcher::Pattern(_)) {
            return Err(format!(
                "Credentials cannot be allowed for origin pattern '{}'",
                self.origin
            ));
        }

        if self.allowed_methods.is_empty() {
            return Err(format!(
                "Policy for '{}' must allow at least one method",
                self.origin
            ));
        }
        for method in &self.allowed_methods {
            Method::from_bytes(method.trim().as_bytes())
                .map_err(|_| format!("Invalid HTTP method '{method}'"))?;
        }

        Ok(())
    }
}
