// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Compiled policy registry and per-request evaluation

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS,
    ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::cors::matcher::{OriginMatcher, PathMapping};
use crate::cors::policy::CorsPolicy;
use crate::error::{AppError, Result};

/// Rule for picking one policy when several are registered for a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyResolution {
    /// First policy, in registration order, whose mapping covers the path
    /// and whose origin matcher accepts the origin
    #[default]
    FirstMatch,
    /// Only the last policy registered for the path is consulted
    LastRegistered,
}

impl FromStr for PolicyResolution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-match" => Ok(PolicyResolution::FirstMatch),
            "last-registered" => Ok(PolicyResolution::LastRegistered),
            other => Err(format!(
                "Unknown policy resolution '{other}': expected 'first-match' or 'last-registered'"
            )),
        }
    }
}

impl fmt::Display for PolicyResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyResolution::FirstMatch => f.write_str("first-match"),
            PolicyResolution::LastRegistered => f.write_str("last-registered"),
        }
    }
}

/// What the browser is asking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// `OPTIONS` carrying `Access-Control-Request-Method`.
    /// `method` is `None` when the requested method is not a valid token.
    Preflight {
        method: Option<Method>,
        headers: Vec<String>,
    },
    Actual { method: Method },
}

/// The CORS-relevant view of an inbound request
#[derive(Debug, Clone)]
pub struct CorsRequest {
    pub path: String,
    pub origin: HeaderValue,
    pub kind: RequestKind,
}

impl CorsRequest {
    /// Returns `None` for requests without an `Origin` header
    pub fn from_parts(method: &Method, path: &str, headers: &HeaderMap) -> Option<Self> {
        let origin = headers.get(ORIGIN)?.clone();

        let kind = match headers.get(ACCESS_CONTROL_REQUEST_METHOD) {
            Some(requested) if *method == Method::OPTIONS => RequestKind::Preflight {
                method: Method::from_bytes(requested.as_bytes()).ok(),
                headers: requested_headers(headers),
            },
            _ => RequestKind::Actual {
                method: method.clone(),
            },
        };

        Some(CorsRequest {
            path: path.to_string(),
            origin,
            kind,
        })
    }

    pub fn is_preflight(&self) -> bool {
        matches!(self.kind, RequestKind::Preflight { .. })
    }
}

fn requested_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(ACCESS_CONTROL_REQUEST_HEADERS)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Response headers granted to a matching request
#[derive(Debug, Clone)]
pub struct CorsGrant {
    headers: HeaderMap,
}

impl CorsGrant {
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Copies the granted headers onto a response, replacing any existing values
    pub fn apply_to(&self, target: &mut HeaderMap) {
        for (name, value) in &self.headers {
            target.insert(name.clone(), value.clone());
        }
    }
}

#[derive(Debug)]
struct CompiledPolicy {
    mapping: PathMapping,
    origin: OriginMatcher,
    methods: Vec<Method>,
    // lowercase names, empty when any header is allowed
    headers: Vec<String>,
    any_header: bool,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    allow_credentials: HeaderValue,
    max_age: HeaderValue,
}

impl CompiledPolicy {
    fn compile(policy: &CorsPolicy) -> std::result::Result<Self, String> {
        policy.validate()?;

        let methods = policy
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes())
                    .map_err(|_| format!("Invalid HTTP method '{m}'"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let joined_methods = methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let allow_methods = HeaderValue::from_str(&joined_methods)
            .map_err(|e| format!("Invalid allowed methods '{joined_methods}': {e}"))?;

        let any_header = policy.allows_any_header();
        let headers: Vec<String> = if any_header {
            Vec::new()
        } else {
            policy
                .allowed_headers
                .iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect()
        };
        let allow_headers = if any_header {
            HeaderValue::from_static("*")
        } else {
            let joined = headers.join(",");
            HeaderValue::from_str(&joined)
                .map_err(|e| format!("Invalid allowed headers '{joined}': {e}"))?
        };

        let allow_credentials = HeaderValue::from_static(if policy.allow_credentials {
            "true"
        } else {
            "false"
        });

        Ok(CompiledPolicy {
            mapping: PathMapping::parse(&policy.mapping),
            origin: policy.origin.clone(),
            methods,
            headers,
            any_header,
            allow_methods,
            allow_headers,
            allow_credentials,
            max_age: HeaderValue::from(policy.max_age_secs),
        })
    }

    fn allows_method(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    fn allows_headers(&self, requested: &[String]) -> bool {
        self.any_header || requested.iter().all(|h| self.headers.contains(h))
    }

    fn grant(&self, origin: &HeaderValue) -> CorsGrant {
        let mut headers = HeaderMap::with_capacity(5);
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            self.allow_credentials.clone(),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        CorsGrant { headers }
    }
}

/// Immutable set of registered policies, built once at startup
#[derive(Debug)]
pub struct CorsRegistry {
    policies: Vec<CompiledPolicy>,
    resolution: PolicyResolution,
}

impl CorsRegistry {
    /// Compiles policies in registration order
    pub fn new(policies: &[CorsPolicy], resolution: PolicyResolution) -> Result<Self> {
        let policies = policies
            .iter()
            .enumerate()
            .map(|(index, policy)| {
                CompiledPolicy::compile(policy)
                    .map_err(|e| AppError::Config(format!("CORS policy #{index}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsRegistry {
            policies,
            resolution,
        })
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn resolution(&self) -> PolicyResolution {
        self.resolution
    }

    /// Decides whether a cross-origin request is granted.
    ///
    /// `None` is a silent non-grant: the caller must not emit any
    /// `Access-Control-*` header.
    pub fn evaluate(&self, request: &CorsRequest) -> Option<CorsGrant> {
        let origin = request.origin.to_str().ok()?;
        let policy = self.resolve(&request.path, origin)?;

        let permitted = match &request.kind {
            RequestKind::Preflight { method, headers } => {
                method.as_ref().is_some_and(|m| policy.allows_method(m))
                    && policy.allows_headers(headers)
            }
            RequestKind::Actual { method } => policy.allows_method(method),
        };

        permitted.then(|| policy.grant(&request.origin))
    }

    fn resolve(&self, path: &str, origin: &str) -> Option<&CompiledPolicy> {
        let mut covering = self.policies.iter().filter(|p| p.mapping.matches(path));
        match self.resolution {
            PolicyResolution::FirstMatch => covering.find(|p| p.origin.matches(origin)),
            PolicyResolution::LastRegistered => {
                covering.last().filter(|p| p.origin.matches(origin))
            }
        }
    }
}
