// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use wise_backend::{
    AppState, Config, CorsPolicy, MetricsRegistry, PolicyResolution, create_router,
};

const FRONTEND: &str = "http://49.246.62.220:2000";
const EVIL: &str = "http://evil.example";

fn make_state(policies: Vec<CorsPolicy>, resolution: PolicyResolution) -> Arc<AppState> {
    let config = Config {
        server_addr: "127.0.0.1:8080".to_string(),
        cors_policies: policies,
        cors_resolution: resolution,
    };
    Arc::new(AppState::new(config, MetricsRegistry::new()).unwrap())
}

fn default_state() -> Arc<AppState> {
    Arc::new(AppState::new(Config::default(), MetricsRegistry::new()).unwrap())
}

fn preflight(path: &str, origin: &str, method: &str) -> Request<String> {
    Request::options(path)
        .header("origin", origin)
        .header("access-control-request-method", method)
        .header("access-control-request-headers", "content-type, x-requested-with")
        .body(String::new())
        .unwrap()
}

fn header<'a>(resp: &'a Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).map(|v| v.to_str().unwrap())
}

fn vary(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all("vary")
        .iter()
        .map(|v| v.to_str().unwrap().to_ascii_lowercase())
        .collect()
}

// --- preflight ---

#[tokio::test]
async fn frontend_preflight_is_granted() {
    let app = create_router(default_state());

    let resp = app.oneshot(preflight("/ready", FRONTEND, "POST")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some(FRONTEND));
    let methods = header(&resp, "access-control-allow-methods").unwrap();
    assert_eq!(methods, "GET,POST,PUT,DELETE,OPTIONS");
    assert!(methods.contains("DELETE") && methods.contains("PUT"));
    assert_eq!(header(&resp, "access-control-allow-headers"), Some("*"));
    assert_eq!(header(&resp, "access-control-allow-credentials"), Some("false"));
    assert_eq!(header(&resp, "access-control-max-age"), Some("3600"));

    let vary = vary(&resp);
    assert!(vary.contains(&"origin".to_string()));
    assert!(vary.contains(&"access-control-request-method".to_string()));
    assert!(vary.contains(&"access-control-request-headers".to_string()));

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn preflight_short_circuits_before_handler() {
    let state = default_state();
    let app = create_router(state.clone());

    let resp = app.oneshot(preflight("/ready", FRONTEND, "GET")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.metrics.ready_probe_count(), 0);
}

#[tokio::test]
async fn preflight_answered_for_unknown_path() {
    let app = create_router(default_state());

    let resp = app
        .oneshot(preflight("/api/v1/recipes", FRONTEND, "PUT"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some(FRONTEND));
}

#[tokio::test]
async fn default_registry_grants_other_origins_through_wildcard() {
    let app = create_router(default_state());

    let resp = app.oneshot(preflight("/ready", EVIL, "GET")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some(EVIL));
    assert_eq!(header(&resp, "access-control-allow-credentials"), Some("false"));
}

#[tokio::test]
async fn exact_policy_alone_denies_other_origins_silently() {
    let state = make_state(
        vec![CorsPolicy::exact(FRONTEND)],
        PolicyResolution::FirstMatch,
    );
    let app = create_router(state.clone());

    let resp = app.oneshot(preflight("/ready", EVIL, "GET")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header(&resp, "access-control-allow-origin").is_none());
    assert!(header(&resp, "access-control-allow-methods").is_none());
    assert!(vary(&resp).contains(&"origin".to_string()));
    assert_eq!(
        state
            .metrics
            .cors_decision_count(&wise_backend::CorsLabels::new(true, false)),
        1
    );
}

#[tokio::test]
async fn last_registered_exact_policy_overrides_wildcard() {
    let state = make_state(
        vec![CorsPolicy::pattern("*"), CorsPolicy::exact(FRONTEND)],
        PolicyResolution::LastRegistered,
    );
    let app = create_router(state);

    let denied = app
        .clone()
        .oneshot(preflight("/ready", EVIL, "GET"))
        .await
        .unwrap();
    assert!(header(&denied, "access-control-allow-origin").is_none());

    let granted = app.oneshot(preflight("/ready", FRONTEND, "GET")).await.unwrap();
    assert_eq!(header(&granted, "access-control-allow-origin"), Some(FRONTEND));
}

#[tokio::test]
async fn disallowed_methods_are_never_named() {
    let app = create_router(default_state());

    for method in ["PATCH", "HEAD", "TRACE", "CONNECT"] {
        let resp = app
            .clone()
            .oneshot(preflight("/ready", FRONTEND, method))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        if let Some(allowed) = header(&resp, "access-control-allow-methods") {
            assert!(
                !allowed.split(',').any(|m| m == method),
                "{method} must not be allowed"
            );
        }
        assert!(header(&resp, "access-control-allow-origin").is_none());
    }
}

#[tokio::test]
async fn non_ascii_origin_preflight_is_denied() {
    let app = create_router(default_state());

    let request = Request::options("/ready")
        .header(
            "origin",
            HeaderValue::from_bytes(b"http://\xc3\xa9.example").unwrap(),
        )
        .header("access-control-request-method", "GET")
        .body(String::new())
        .unwrap();
    let resp = app.oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
    assert!(header(&resp, "access-control-allow-methods").is_none());
}

// --- actual requests ---

#[tokio::test]
async fn actual_request_is_annotated() {
    let app = create_router(default_state());

    let resp = app
        .oneshot(
            Request::get("/ready")
                .header("origin", FRONTEND)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some(FRONTEND));
    assert_eq!(header(&resp, "access-control-allow-credentials"), Some("false"));
    assert_eq!(vary(&resp), vec!["origin".to_string()]);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn denied_actual_request_still_executes() {
    let state = make_state(
        vec![CorsPolicy::exact(FRONTEND)],
        PolicyResolution::FirstMatch,
    );
    let app = create_router(state.clone());

    let resp = app
        .oneshot(
            Request::get("/ready")
                .header("origin", EVIL)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header(&resp, "access-control-allow-origin").is_none());
    assert_eq!(state.metrics.ready_probe_count(), 1);
}

#[tokio::test]
async fn same_origin_request_has_no_cors_headers() {
    let state = default_state();
    let app = create_router(state.clone());

    let resp = app
        .oneshot(Request::get("/ready").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header(&resp, "access-control-allow-origin").is_none());
    assert!(header(&resp, "vary").is_none());
    assert_eq!(
        state
            .metrics
            .cors_decision_count(&wise_backend::CorsLabels::new(false, true)),
        0
    );
}

#[tokio::test]
async fn options_without_request_method_reaches_router() {
    let app = create_router(default_state());

    let resp = app
        .oneshot(
            Request::options("/ready")
                .header("origin", FRONTEND)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    // Not a preflight: /ready only serves GET
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some(FRONTEND));
}
