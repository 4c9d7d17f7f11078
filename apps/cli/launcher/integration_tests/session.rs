use launcher::session::run_session;
use launcher::settings::LaunchSettings;

use bridge_core::{BridgeConfig, LaunchOptions, LaunchState};
use common::Credentials;
use models::HeaderSet;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_ID: &str = "sample-client";

fn settings(token: &str, headers: HeaderSet) -> LaunchSettings {
    LaunchSettings {
        credentials: Credentials::new(token),
        options: LaunchOptions::default().with_headers(headers),
    }
}

/// **VALUE**: End-to-end: credentials exchanged, session page fetched, report built.
///
/// **WHY THIS MATTERS**: This is the whole launcher. Each piece is tested alone,
/// but only this catches wiring mistakes such as the page wait starting after the
/// page events were dropped.
///
/// **BUG THIS CATCHES**: Would catch the session load not carrying launch headers
/// or the report pointing at the authentication endpoint instead of the session.
#[tokio::test]
async fn given_valid_token_when_running_session_then_report_is_success() {
    // GIVEN: An auth endpoint and a session page, both requiring the header
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/verify_token"))
        .and(body_json(json!({"client_id": CLIENT_ID, "token": "good-token"})))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/session/abc?otp=1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/abc"))
        .and(header("X-Session-Tag", "abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let config = BridgeConfig::new(CLIENT_ID, server.uri());

    // WHEN: Running a session
    let report = run_session(config, settings("good-token", HeaderSet::from([("X-Session-Tag", "abc")]))).await;

    // THEN: Loaded with the session path and a 200
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(report.state, LaunchState::Loaded);
    assert_eq!(report.session_path.as_deref(), Some("/session/abc"));
    assert_eq!(report.page_status, Some(200));
}

#[tokio::test]
async fn given_rejected_token_when_running_session_then_report_carries_core_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/verify_token"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;
    let config = BridgeConfig::new(CLIENT_ID, server.uri());

    let report = run_session(config, settings("bad-token", HeaderSet::new())).await;

    assert!(!report.is_success());
    assert_eq!(report.state, LaunchState::Failed);
    let error = serde_json::to_value(report.error.as_ref().unwrap()).unwrap();
    assert_eq!(error["type"], "Core");
    assert!(error["data"]["message"].as_str().unwrap().contains("Invalid Credentials"));
}

#[tokio::test]
async fn given_invalid_config_when_running_session_then_report_fails_idle() {
    let config = BridgeConfig::new("", "https://content.example.com");

    let report = run_session(config, settings("t", HeaderSet::new())).await;

    assert!(!report.is_success());
    assert_eq!(report.state, LaunchState::Idle);
}
