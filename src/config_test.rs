use std::collections::HashMap;

use super::*;

fn config_from(pairs: &[(&str, &str)]) -> Result<HostConfig, ConfigError> {
    let env: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    HostConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_apply_when_unset() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.backend_url, DEFAULT_BACKEND_URL);
    assert_eq!(
        cfg.timeouts,
        BackendTimeouts {
            request_secs: DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS,
        }
    );
    assert_eq!(cfg.max_body_bytes, DEFAULT_PROXY_MAX_BODY_BYTES);
}

#[test]
fn overrides_are_parsed() {
    let cfg = config_from(&[
        ("PORT", "8080"),
        ("BACKEND_URL", "https://api.example.test/"),
        ("BACKEND_REQUEST_TIMEOUT_SECS", "42"),
        ("BACKEND_CONNECT_TIMEOUT_SECS", "7"),
        ("PROXY_MAX_BODY_BYTES", "1024"),
    ])
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.backend_url, "https://api.example.test");
    assert_eq!(cfg.timeouts, BackendTimeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.max_body_bytes, 1024);
}

#[test]
fn invalid_port_errors() {
    assert_eq!(config_from(&[("PORT", "http")]), Err(ConfigError::InvalidPort("http".to_owned())));
    assert_eq!(config_from(&[("PORT", "70000")]), Err(ConfigError::InvalidPort("70000".to_owned())));
}

#[test]
fn blank_port_uses_default() {
    assert_eq!(config_from(&[("PORT", "  ")]).unwrap().port, DEFAULT_PORT);
}

#[test]
fn backend_url_requires_http_scheme() {
    let err = config_from(&[("BACKEND_URL", "localhost:5012")]).unwrap_err();
    assert_eq!(err, ConfigError::InvalidBackendUrl("localhost:5012".to_owned()));
    assert!(err.to_string().contains("expected http:// or https://"));
}

#[test]
fn unparseable_numbers_fall_back_to_defaults() {
    let cfg = config_from(&[("BACKEND_REQUEST_TIMEOUT_SECS", "soon"), ("PROXY_MAX_BODY_BYTES", "-1")]).unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.max_body_bytes, DEFAULT_PROXY_MAX_BODY_BYTES);
}
