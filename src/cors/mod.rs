// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Cross-origin access policy
//!
//! Policies are compiled once into a [`CorsRegistry`] and evaluated by
//! [`cors_middleware`] for every request carrying an `Origin` header.
//! When several policies cover a path, [`PolicyResolution`] picks one.

mod matcher;
mod middleware;
mod policy;
mod registry;


pub use matcher::{OriginMatcher, PathMapping};
pub use middleware::cors_middleware;
pub use policy::CorsPolicy;
pub use registry::{CorsGrant, CorsRegistry, CorsRequest, PolicyResolution, RequestKind};
