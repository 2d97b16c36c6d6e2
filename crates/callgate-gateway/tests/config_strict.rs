#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use callgate_gateway::config;
use callgate_gateway::transport::handshake::OriginPolicy;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:3000"
  ping_intervl_ms: 25000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.ping_interval_ms, 25000);
    assert_eq!(cfg.gateway.ping_timeout_ms, 20000);
    assert_eq!(cfg.gateway.max_payload_bytes, 1_000_000);
    assert_eq!(cfg.gateway.allowed_origins, vec!["*".to_string()]);
    assert_eq!(cfg.inference.predict_url(), "http://127.0.0.1:8000/predict");
    assert_eq!(cfg.inference.timeout_ms, 60000);
}

#[test]
fn wrong_version_is_unsupported() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values_fail_validation() {
    let bad = r#"
version: 1
gateway:
  max_payload_bytes: 10
"#;
    assert!(config::load_from_str(bad).is_err());

    let bad = r#"
version: 1
gateway:
  allowed_origins: []
"#;
    assert!(config::load_from_str(bad).is_err());

    let bad = r#"
version: 1
inference:
  predict_path: "predict"
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn env_overrides_inference_section() {
    let mut cfg = config::load_from_str("version: 1\n").unwrap();
    let env: HashMap<&str, &str> = [
        ("ML_URL", "http://ml.internal:9000/"),
        ("ML_PREDICT_PATH", "/v2/predict"),
        ("ML_TIMEOUT_MS", "1500"),
    ]
    .into_iter()
    .collect();

    config::apply_env(&mut cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(cfg.inference.predict_url(), "http://ml.internal:9000/v2/predict");
    assert_eq!(cfg.inference.timeout_ms, 1500);
    cfg.validate().unwrap();
}

#[test]
fn env_timeout_must_be_numeric() {
    let mut cfg = config::load_from_str("version: 1\n").unwrap();
    let err = config::apply_env(&mut cfg, |k| (k == "ML_TIMEOUT_MS").then(|| "soon".to_string()))
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn origin_policy() {
    assert!(OriginPolicy::from_config(&["*".to_string()]).allows("https://evil.example"));

    let p = OriginPolicy::from_config(&["https://app.example.com/".to_string()]);
    assert!(p.allows("https://app.example.com"));
    assert!(p.allows("HTTPS://APP.EXAMPLE.COM"));
    assert!(!p.allows("https://other.example.com"));

    let mut headers = axum::http::HeaderMap::new();
    assert!(p.check(&headers).is_ok(), "missing origin passes");
    headers.insert(axum::http::header::ORIGIN, "https://other.example.com".parse().unwrap());
    assert_eq!(p.check(&headers).unwrap_err().client_code().as_str(), "NOT_ALLOWED");
}
