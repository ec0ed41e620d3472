use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "MPA_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.api_base_url, "http://localhost:7777");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_agent, "mpa/0.1 (manual-purchase-agent)");
    assert_eq!(
        cfg.state_path.to_string_lossy(),
        "./.mpa/local_storage.json"
    );
    assert_eq!(cfg.max_manuals, 4);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("MPA_API_BASE_URL", "https://agent.example.com");
    map.insert("MPA_ENV", "production");
    map.insert("MPA_MAX_MANUALS", "6");
    map.insert("MPA_STATE_PATH", "/tmp/mpa.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://agent.example.com");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.max_manuals, 6);
    assert_eq!(cfg.state_path.to_string_lossy(), "/tmp/mpa.json");
}

#[test]
fn build_app_config_has_no_request_timeout_setting() {
    let mut map = HashMap::new();
    map.insert("MPA_REQUEST_TIMEOUT_SECS", "soon");
    assert!(build_app_config(lookup_from_map(&map)).is_ok());
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("MPA_API_BASE_URL", "localhost:7777");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MPA_API_BASE_URL"),
        "expected InvalidEnvVar(MPA_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_negative_max_manuals() {
    let mut map = HashMap::new();
    map.insert("MPA_MAX_MANUALS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MPA_MAX_MANUALS"
    ));
}
