// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Origin and path matching

use serde::Deserialize;
use std::fmt;

/// How a policy decides whether it covers a request origin
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginMatcher {
    /// Scheme, host and port must match exactly
    Exact(String),
    /// `*` matches any run of characters, so `*` alone matches every origin
    Pattern(String),
}

impl OriginMatcher {
    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginMatcher::Exact(allowed) => {
                normalize(allowed).eq_ignore_ascii_case(normalize(origin))
            }
            OriginMatcher::Pattern(pattern) => {
                wildcard_match(normalize(pattern).as_bytes(), normalize(origin).as_bytes())
            }
        }
    }
}

impl fmt::Display for OriginMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginMatcher::Exact(origin) => f.write_str(origin),
            OriginMatcher::Pattern(pattern) => f.write_str(pattern),
        }
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

/// Case-insensitive glob match supporting only `*`
fn wildcard_match(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p].eq_ignore_ascii_case(&text[t]) {
            p += 1;
            t += 1;
        } else if let Some((star, consumed)) = backtrack {
            p = star + 1;
            t = consumed + 1;
            backtrack = Some((star, consumed + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}

/// Path pattern a policy is registered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMapping {
    /// `/**`
    All,
    /// `/prefix/**`
    Prefix(String),
    Exact(String),
}

impl PathMapping {
    pub fn parse(mapping: &str) -> Self {
        let mapping = mapping.trim();
        if mapping == "/**" {
            return PathMapping::All;
        }
        match mapping.strip_suffix("/**") {
            Some(prefix) => PathMapping::Prefix(prefix.to_string()),
            None => PathMapping::Exact(mapping.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMapping::All => true,
            PathMapping::Prefix(prefix) => path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
            PathMapping::Exact(exact) => path == exact,
        }
    }
}
