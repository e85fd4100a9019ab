use super::*;

// =============================================================================
// JSON
// =============================================================================

#[test]
fn empty_document_uses_defaults() {
    let cfg = AuthConfig::from_json("{}").unwrap();
    assert_eq!(cfg, AuthConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.origin_env_key.as_deref(), Some(DEFAULT_ORIGIN_ENV_KEY));
    assert_eq!(cfg.endpoints, Endpoints::standard());
}

#[test]
fn explicit_endpoints_leave_omitted_ones_unconfigured() {
    let cfg = AuthConfig::from_json(
        r#"{
            "endpoints": {
                "sign_in": { "path": "/login", "method": "post" },
                "get_session": { "path": "/user", "method": "get" },
                "csrf": { "path": "/csrf" }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(cfg.endpoints.sign_in, Some(Endpoint::new("/login", HttpMethod::Post)));
    assert_eq!(cfg.endpoints.get_session, Some(Endpoint::new("/user", HttpMethod::Get)));
    assert_eq!(cfg.endpoints.csrf, Some(Endpoint::new("/csrf", HttpMethod::Get)));
    assert!(cfg.endpoints.sign_out.is_none());
    assert!(cfg.endpoints.sign_up.is_none());
}

#[test]
fn nested_sections_merge_with_defaults() {
    let cfg = AuthConfig::from_json(r#"{ "csrf": { "cookie_name": "csrf" }, "redirect": { "sign_out": "/" } }"#).unwrap();
    assert_eq!(cfg.csrf.cookie_name, "csrf");
    assert_eq!(cfg.csrf.header_name, DEFAULT_CSRF_HEADER);
    assert_eq!(cfg.redirect.sign_out.as_deref(), Some("/"));
    assert_eq!(cfg.redirect.fallback_ms, DEFAULT_REDIRECT_FALLBACK_MS);
}

#[test]
fn unknown_method_is_a_config_error() {
    let err = AuthConfig::from_json(r#"{ "endpoints": { "sign_in": { "path": "/x", "method": "brew" } } }"#).unwrap_err();
    assert!(matches!(err, AuthError::Config(_)));
}

#[test]
fn method_maps_to_http_method() {
    assert_eq!(HttpMethod::Get.as_method(), reqwest::Method::GET);
    assert_eq!(HttpMethod::Delete.as_method(), reqwest::Method::DELETE);
}

// =============================================================================
// ENV: single test so the shared AUTH_* variables are never raced.
// =============================================================================

#[test]
fn from_env_layers_overrides() {
    let path = std::env::temp_dir().join("session_auth_config_test.json");
    std::fs::write(&path, r#"{ "base_url": "https://file.example/api", "cookie": { "name": "sid" } }"#).unwrap();

    unsafe {
        std::env::set_var("AUTH_CONFIG_FILE", &path);
        std::env::set_var("AUTH_DISABLE_INTERNAL_ROUTING", " Yes ");
        std::env::set_var("AUTH_ORIGIN_ENV_KEY", "");
        std::env::set_var("AUTH_CSRF_COOKIE", "csrf_token");
    }

    let cfg = AuthConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://file.example/api");
    assert_eq!(cfg.cookie.name, "sid");
    assert!(cfg.disable_internal_routing);
    assert!(cfg.origin_env_key.is_none());
    assert_eq!(cfg.csrf.cookie_name, "csrf_token");

    unsafe { std::env::set_var("AUTH_BASE_URL", "/auth") };
    assert_eq!(AuthConfig::from_env().unwrap().base_url, "/auth");

    unsafe { std::env::set_var("AUTH_CONFIG_FILE", "/definitely/not/here.json") };
    assert!(matches!(AuthConfig::from_env(), Err(AuthError::Config(_))));

    unsafe {
        std::env::remove_var("AUTH_CONFIG_FILE");
        std::env::remove_var("AUTH_DISABLE_INTERNAL_ROUTING");
        std::env::remove_var("AUTH_ORIGIN_ENV_KEY");
        std::env::remove_var("AUTH_CSRF_COOKIE");
        std::env::remove_var("AUTH_BASE_URL");
    }
    let _ = std::fs::remove_file(path);
}

#[test]
fn env_bool_parses_variants() {
    for (i, (raw, expected)) in [("on", Some(true)), ("OFF", Some(false)), ("maybe", None)].iter().enumerate() {
        let key = format!("__TEST_SA_ENV_BOOL_{i}__");
        unsafe { std::env::set_var(&key, raw) };
        assert_eq!(env_bool(&key), *expected, "unexpected result for {raw:?}");
        unsafe { std::env::remove_var(&key) };
    }
    assert_eq!(env_bool("__TEST_SA_ENV_BOOL_UNSET__"), None);
}
