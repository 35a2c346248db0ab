// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Request interception: answers preflights, annotates actual responses

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::VARY},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::AppState;
use crate::cors::registry::CorsRequest;
use crate::metrics::CorsLabels;

/// CORS middleware, layered ahead of every route and the fallback.
///
/// Preflights never reach a handler. Denied requests get no
/// `Access-Control-*` headers but still execute.
pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(cors_request) =
        CorsRequest::from_parts(request.method(), request.uri().path(), request.headers())
    else {
        return next.run(request).await;
    };

    let preflight = cors_request.is_preflight();
    let grant = state.cors.evaluate(&cors_request);

    state
        .metrics
        .record_cors_decision(&CorsLabels::new(preflight, grant.is_some()));
    tracing::debug!(
        origin = ?cors_request.origin,
        path = %cors_request.path,
        preflight,
        granted = grant.is_some(),
        "CORS decision"
    );

    let mut response = if preflight {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    append_vary(headers, preflight);
    if let Some(grant) = &grant {
        grant.apply_to(headers);
    }

    response
}

fn append_vary(headers: &mut HeaderMap, preflight: bool) {
    headers.append(VARY, HeaderValue::from_static("origin"));
    if preflight {
        headers.append(
            VARY,
            HeaderValue::from_static("access-control-request-method"),
        );
        headers.append(
            VARY,
            HeaderValue::from_static("access-control-request-headers"),
        );
    }
}
