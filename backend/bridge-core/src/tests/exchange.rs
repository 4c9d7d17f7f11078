use crate::VERIFY_TOKEN_PATH;
use crate::config::BridgeConfig;
use crate::exchange::{CredentialExchange, request_headers, verify_token_url};

use models::HeaderSet;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

/// **VALUE**: Verifies the endpoint keeps the deployment's path prefix.
///
/// **WHY THIS MATTERS**: Content is often deployed under a sub-path. `Url::join`
/// without a trailing slash replaces the last segment, which would post the
/// credentials to the wrong endpoint.
///
/// **BUG THIS CATCHES**: Would catch the trailing-slash normalization being
/// removed, or query/fragment of the base leaking into the endpoint.
#[test]
fn given_base_urls_when_resolving_endpoint_then_prefix_is_kept() {
    // GIVEN: Bases with and without path prefix and trailing slash
    let cases = [
        ("https://content.example.com", "https://content.example.com/users/verify_token"),
        ("https://content.example.com/", "https://content.example.com/users/verify_token"),
        ("https://content.example.com/app", "https://content.example.com/app/users/verify_token"),
        ("https://content.example.com/app/?x=1#top", "https://content.example.com/app/users/verify_token"),
    ];

    for (base, expected) in cases {
        // WHEN: Resolving the endpoint
        let endpoint = verify_token_url(&Url::parse(base).unwrap()).unwrap();

        // THEN: The path is appended under the base
        assert_eq!(endpoint.as_str(), expected, "for base {base}");
    }
}

#[test]
fn given_verify_token_path_then_is_relative() {
    assert_eq!(VERIFY_TOKEN_PATH, "users/verify_token");
    assert!(!VERIFY_TOKEN_PATH.starts_with('/'));
}

/// **VALUE**: Verifies the default JSON headers and that caller headers override them.
///
/// **BUG THIS CATCHES**: Would catch `.json()` being applied after `.headers()` in a
/// way that loses the `utf-8` content type, or defaults clobbering caller values.
#[test]
fn given_custom_headers_when_building_request_headers_then_defaults_then_custom() {
    // GIVEN: A custom header plus an override of Accept
    let custom = HeaderSet::from([("X-Session-Tag", "abc"), ("accept", "application/vnd.custom+json")]);

    // WHEN: Building the header map
    let headers = request_headers(&custom);

    // THEN: Content-Type is the default, Accept is the caller's
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json; utf-8");
    assert_eq!(headers.get(ACCEPT).unwrap(), "application/vnd.custom+json");
    assert_eq!(headers.get("x-session-tag").unwrap(), "abc");
}

#[test]
fn given_invalid_header_when_building_request_headers_then_it_is_skipped() {
    let custom = HeaderSet::from([("bad header", "v"), ("X-Ok", "fine"), ("X-Newline", "a\nb")]);

    let headers = request_headers(&custom);

    assert_eq!(headers.get("x-ok").unwrap(), "fine");
    assert!(headers.get("x-newline").is_none());
    // Content-Type, Accept, X-Ok
    assert_eq!(headers.len(), 3);
}

#[test]
fn given_config_when_exchange_built_then_endpoint_resolved() {
    let config = BridgeConfig::new("sample-client", "http://127.0.0.1:9/base");

    let exchange = CredentialExchange::new(&config).unwrap();

    assert_eq!(exchange.endpoint().as_str(), "http://127.0.0.1:9/base/users/verify_token");
}

#[test]
fn given_unusable_base_url_when_exchange_built_then_config_error() {
    let config = BridgeConfig::new("sample-client", "file:///tmp/content");

    assert!(CredentialExchange::new(&config).is_err());
}
