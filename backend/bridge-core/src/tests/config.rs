use crate::config::BridgeConfig;
use crate::context::diagnostics::Diagnostics;
use crate::error::config::ConfigError;
use crate::host::{InterceptDecision, InterceptedRequest, RequestInterceptor};

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

fn valid_config() -> BridgeConfig {
    BridgeConfig::new("sample-client", "https://content.example.com/app")
}

/// **VALUE**: Verifies save/load persists every field.
///
/// **WHY THIS MATTERS**: The launcher reads its config from disk on every start.
/// A field that does not survive the round trip silently reverts to its default.
///
/// **BUG THIS CATCHES**: Would catch a serde rename or a missing default that makes
/// a saved file unreadable.
#[test]
fn given_saved_config_when_loaded_then_all_fields_match() {
    // GIVEN: A customized config saved to a temp dir
    let dir = TempDir::new().unwrap();
    let config = valid_config()
        .with_script_namespace("hostBridge")
        .with_request_timeout(Duration::from_secs(12));
    config.save(dir.path()).unwrap();

    // WHEN: Loading it back
    let loaded = BridgeConfig::load(dir.path()).unwrap();

    // THEN: Nothing changed and no temp file is left behind
    assert_eq!(loaded, config);
    assert!(!dir.path().join("bridge.json.tmp").exists());
}

#[test]
fn given_missing_file_when_loaded_then_returns_not_found() {
    let dir = TempDir::new().unwrap();

    let result = BridgeConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

/// **VALUE**: Verifies optional fields fall back to defaults.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` forcing every
/// deployment to spell out the namespace and timeout.
#[test]
fn given_minimal_json_when_loaded_then_defaults_apply() {
    // GIVEN: A file with only the required keys
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bridge.json"),
        r#"{"client_id":"sample-client","base_url":"https://content.example.com"}"#,
    )
    .unwrap();

    // WHEN: Loading
    let config = BridgeConfig::load(dir.path()).unwrap();

    // THEN: Defaults are filled in
    assert_eq!(config.version, 1);
    assert_eq!(config.script_namespace, "contentBridge");
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
}

#[test]
fn given_corrupt_json_when_loaded_then_returns_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bridge.json"), "{ not json").unwrap();

    let result = BridgeConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies validation rejects each class of bad value.
///
/// **WHY THIS MATTERS**: The namespace is spliced into evaluated scripts and the
/// base URL decides where credentials are sent. Both must be checked up front.
///
/// **BUG THIS CATCHES**: Would catch a namespace containing script syntax, or a
/// non-http base URL, getting past construction.
#[test]
fn given_invalid_values_when_validated_then_each_is_rejected() {
    // GIVEN: Configs that each break one rule
    let cases = vec![
        ("empty client id", BridgeConfig::new("  ", "https://content.example.com")),
        ("unparsable url", BridgeConfig::new("c", "not a url")),
        ("non-http url", BridgeConfig::new("c", "ftp://content.example.com")),
        ("opaque url", BridgeConfig::new("c", "mailto:someone@example.com")),
        (
            "script in namespace",
            valid_config().with_script_namespace("x);alert(1"),
        ),
        ("leading digit namespace", valid_config().with_script_namespace("1bridge")),
        ("zero timeout", valid_config().with_request_timeout(Duration::ZERO)),
        (
            "huge timeout",
            valid_config().with_request_timeout(Duration::from_secs(301)),
        ),
        (
            "future version",
            BridgeConfig {
                version: 2,
                ..valid_config()
            },
        ),
    ];

    // WHEN/THEN: Every one fails validation
    for (name, config) in cases {
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "Expected validation error for {name}"
        );
    }
}

#[test]
fn given_valid_config_when_validated_then_ok() {
    assert!(valid_config().validate().is_ok());
    assert!(
        valid_config()
            .with_script_namespace("$bridge_2")
            .validate()
            .is_ok()
    );
}

#[test]
fn given_invalid_config_when_saved_then_nothing_is_written() {
    let dir = TempDir::new().unwrap();
    let config = BridgeConfig::new("", "https://content.example.com");

    let result = config.save(dir.path());

    assert!(result.is_err());
    assert!(!dir.path().join("bridge.json").exists());
}

/// **VALUE**: Verifies sub-second timeouts round up instead of truncating to zero.
///
/// **BUG THIS CATCHES**: Would catch `Duration::as_secs` truncation turning a
/// 500 ms timeout into 0, which validation then rejects with a misleading value.
#[test]
fn given_fractional_timeout_when_set_then_rounded_up_to_whole_seconds() {
    let cases = [
        (Duration::from_millis(1), 1),
        (Duration::from_millis(500), 1),
        (Duration::from_millis(1500), 2),
        (Duration::from_secs(7), 7),
    ];

    for (timeout, expected_secs) in cases {
        let config = valid_config().with_request_timeout(timeout);
        assert_eq!(config.request_timeout_secs, expected_secs, "timeout {timeout:?}");
        assert!(config.validate().is_ok(), "timeout {timeout:?}");
    }
}

#[test]
fn given_config_with_diagnostics_when_saved_then_file_omits_them() {
    // GIVEN: A config carrying an interceptor
    let dir = TempDir::new().unwrap();
    let interceptor: RequestInterceptor =
        Arc::new(|_: &InterceptedRequest<'_>| InterceptDecision::Passthrough);
    let config = valid_config().with_diagnostics(Diagnostics::new().with_interceptor(interceptor));

    // WHEN: Saving and loading it back
    config.save(dir.path()).unwrap();
    let written = std::fs::read_to_string(dir.path().join("bridge.json")).unwrap();
    let loaded = BridgeConfig::load(dir.path()).unwrap();

    // THEN: Interceptors are code-only
    assert!(!written.contains("diagnostics"));
    assert!(loaded.diagnostics.is_empty());
    assert_eq!(loaded.client_id, config.client_id);
}
