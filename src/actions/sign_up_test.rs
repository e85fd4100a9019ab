use reqwest::Method;
use serde_json::json;

use super::*;
use crate::context::RequestContext;
use crate::http::HttpResponse;
use crate::session::AuthStatus;
use crate::test_helpers::{CURRENT_URL, browser_harness, credentials, harness, scenario_config, user_json};

#[tokio::test]
async fn prevent_login_flow_returns_raw_response() {
    let h = browser_harness();
    h.cookies.insert("XSRF-TOKEN", "tok");
    h.transport.on(Method::POST, "/register", HttpResponse::json(201, &json!({ "id": 42 })));

    let options = SignUpOptions { prevent_login_flow: true, ..SignUpOptions::default() };
    let result = h.client.sign_up(credentials(), options).await.unwrap();

    assert_eq!(result, Some(json!({ "id": 42 })));
    assert_eq!(h.transport.call_lines(), vec!["POST /register"]);
    assert_eq!(h.transport.calls()[0].body, Some(json!({ "email": "a@b.com", "password": "x" })));
    assert_eq!(h.client.status(), AuthStatus::Unauthenticated);
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn sign_up_chains_into_sign_in() {
    let h = browser_harness();
    h.transport.on(Method::GET, "/csrf", crate::test_helpers::csrf_response());
    h.transport.on(Method::POST, "/register", HttpResponse::json(201, &json!({ "id": 42 })));
    h.transport.on(Method::POST, "/login", HttpResponse::json(200, &json!({ "ok": true })));
    h.transport.on(Method::GET, "/user", HttpResponse::json(200, &user_json()));

    let result = h.client.sign_up(credentials(), SignUpOptions::default()).await.unwrap();

    assert!(result.is_none());
    assert_eq!(h.transport.call_lines(), vec!["GET /csrf", "POST /register", "POST /login", "GET /user"]);
    assert_eq!(h.client.status(), AuthStatus::Authenticated);
    assert_eq!(h.navigator.visits(), vec![(CURRENT_URL.to_owned(), false)]);
}

#[tokio::test]
async fn missing_endpoint_returns_none() {
    let mut config = scenario_config();
    config.endpoints.sign_up = None;
    let h = harness(config, RequestContext::browser(CURRENT_URL));

    let result = h.client.sign_up(credentials(), SignUpOptions::default()).await.unwrap();

    assert!(result.is_none());
    assert!(h.transport.calls().is_empty());
}

#[tokio::test]
async fn rejected_sign_up_does_not_sign_in() {
    let h = browser_harness();
    h.cookies.insert("XSRF-TOKEN", "tok");
    h.transport.on(Method::POST, "/register", HttpResponse::json(422, &json!({ "message": "taken" })));

    let err = h.client.sign_up(credentials(), SignUpOptions::default()).await.unwrap_err();

    assert!(matches!(err, AuthError::Status { status: 422, .. }));
    assert_eq!(h.transport.call_lines(), vec!["POST /register"]);
}
