use crate::bridge_tests::helpers::{
    RecordingHost, TEST_CLIENT_ID, TEST_TOKEN, VERIFY_TOKEN_ENDPOINT, create_bridge,
    launch_and_wait, session_url, start_auth_server,
};

use bridge_core::{Bridge, BridgeConfig, LaunchError, LaunchOptions, LaunchState};
use common::Credentials;
use models::{HeaderSet, LaunchConfig, Locale};

use std::time::Duration;

use serde_json::json;
use tokio::sync::oneshot;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Endpoint answering every authentication call with `response`, hit exactly once.
async fn server_responding_with(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;
    server
}

async fn authentication_attempts(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording is enabled by default")
        .len()
}

/// **VALUE**: Verifies a redirect response loads exactly the redirected URL.
///
/// **WHY THIS MATTERS**: The redirect target is the authenticated session. If the
/// client followed the redirect itself, the session cookie would land in the HTTP
/// client instead of the content host, and the content would load logged out.
///
/// **BUG THIS CATCHES**: Would catch redirects being followed, the Location being
/// resolved against the wrong base, or the load bypassing host dispatch.
#[tokio::test]
async fn given_redirect_response_when_launching_then_host_loads_session_url() {
    // GIVEN: An endpoint that redirects to the session
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    // WHEN: Launching
    let result = launch_and_wait(&bridge, LaunchOptions::default()).await;

    // THEN: One load of the session URL, completed through dispatch
    assert!(result.is_ok(), "Launch should succeed: {:?}", result);
    let loads = host.loads();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].0, session_url(&server));
    assert_eq!(host.dispatch_count(), 1);
    assert_eq!(bridge.state(), LaunchState::Loaded);

    let context = bridge.request_context();
    assert_eq!(context.session_url, Some(session_url(&server)));
    assert_eq!(context.credentials, Some(Credentials::new(TEST_TOKEN)));
}

/// **VALUE**: Verifies the authentication body carries client id, token and language tag.
///
/// **WHY THIS MATTERS**: The backend picks the content language from the body.
/// Sending `fr_CA` or omitting the region renders the wrong locale for the whole
/// session.
///
/// **BUG THIS CATCHES**: Would catch Rust-style `_` separators, dropped variants,
/// or a `"locale": null` key when no locale is set.
#[tokio::test]
async fn given_locales_when_launching_then_body_carries_language_tag() {
    // GIVEN: (locale, expected body)
    let cases = vec![
        (
            Some(Locale::new("fr").with_region("CA")),
            json!({"client_id": TEST_CLIENT_ID, "token": TEST_TOKEN, "locale": "fr-CA"}),
        ),
        (
            Some(Locale::new("fr")),
            json!({"client_id": TEST_CLIENT_ID, "token": TEST_TOKEN, "locale": "fr"}),
        ),
        (
            Some(Locale::parse("sl_IT_nedis").unwrap()),
            json!({"client_id": TEST_CLIENT_ID, "token": TEST_TOKEN, "locale": "sl-IT-nedis"}),
        ),
        (
            None,
            json!({"client_id": TEST_CLIENT_ID, "token": TEST_TOKEN}),
        ),
    ];

    for (locale, expected_body) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(VERIFY_TOKEN_ENDPOINT))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/session/abc"))
            .expect(1)
            .mount(&server)
            .await;

        let host = RecordingHost::new();
        let bridge = create_bridge(&server, &host);
        let launch_config = match locale {
            Some(locale) => LaunchConfig::default().with_locale(locale),
            None => LaunchConfig::default(),
        };

        // WHEN: Launching with the locale
        let result = launch_and_wait(
            &bridge,
            LaunchOptions::default().with_launch_config(launch_config),
        )
        .await;

        // THEN: The body matched exactly
        assert!(result.is_ok(), "Body mismatch, expected {expected_body}: {:?}", result);
    }
}

#[tokio::test]
async fn given_timezone_and_theme_when_launching_then_body_includes_them() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .and(body_json(json!({
            "client_id": TEST_CLIENT_ID,
            "token": TEST_TOKEN,
            "timezone": "Europe/Ljubljana",
            "theme": "dark"
        })))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/session/abc"))
        .expect(1)
        .mount(&server)
        .await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    let config = LaunchConfig::default()
        .with_timezone("Europe/Ljubljana")
        .with_theme("dark");
    let result = launch_and_wait(&bridge, LaunchOptions::default().with_launch_config(config)).await;

    assert!(result.is_ok(), "{:?}", result);
    let context = bridge.request_context();
    assert_eq!(context.timezone.as_deref(), Some("Europe/Ljubljana"));
    assert_eq!(context.theme.as_deref(), Some("dark"));
}

/// **VALUE**: Verifies the location query parameter is sent only when non-empty.
///
/// **BUG THIS CATCHES**: Would catch `?location=` being sent for an empty string,
/// which the backend treats as a request for the root page.
#[tokio::test]
async fn given_location_when_launching_then_query_param_present_only_if_non_empty() {
    // GIVEN: A server expecting the location, and one expecting none
    let with_location = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .and(query_param("location", "/dreams/42"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/session/abc"))
        .expect(1)
        .mount(&with_location)
        .await;

    let without_location = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .and(query_param_is_missing("location"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/session/abc"))
        .expect(1)
        .mount(&without_location)
        .await;

    // WHEN: Launching with a location, then with an empty one
    let first = launch_and_wait(
        &create_bridge(&with_location, &RecordingHost::new()),
        LaunchOptions::default().with_location("/dreams/42"),
    )
    .await;
    let second = launch_and_wait(
        &create_bridge(&without_location, &RecordingHost::new()),
        LaunchOptions::default().with_location(""),
    )
    .await;

    // THEN: Both matched their expectation
    assert!(first.is_ok(), "{:?}", first);
    assert!(second.is_ok(), "{:?}", second);
}

/// **VALUE**: Verifies launch headers reach the authentication request.
///
/// **BUG THIS CATCHES**: Would catch custom headers being applied only to the
/// session load, or `.json()` overwriting the `utf-8` content type.
#[tokio::test]
async fn given_launch_headers_when_launching_then_sent_with_authentication() {
    // GIVEN: An endpoint that requires the custom header and JSON content type
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .and(header("X-Session-Tag", "abc"))
        .and(header("Content-Type", "application/json; utf-8"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/session/abc"))
        .expect(1)
        .mount(&server)
        .await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);
    let headers = HeaderSet::from([("X-Session-Tag", "abc")]);

    // WHEN: Launching with the header
    let result = launch_and_wait(&bridge, LaunchOptions::default().with_headers(headers.clone())).await;

    // THEN: Authentication matched and the session load carries the same headers
    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(host.loads()[0].1, headers);
}

/// **VALUE**: Verifies HTTP 422 maps to invalid credentials and nothing is loaded.
///
/// **WHY THIS MATTERS**: Hosts react to invalid credentials by re-authenticating
/// the user. Any other error is shown as a generic failure.
///
/// **BUG THIS CATCHES**: Would catch 422 being folded into the generic HTTP error,
/// or a failed launch still loading something.
#[tokio::test]
async fn given_unprocessable_entity_when_launching_then_invalid_credentials() {
    // GIVEN: An endpoint rejecting the token
    let server = server_responding_with(ResponseTemplate::new(422)).await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    // WHEN: Launching
    let result = launch_and_wait(&bridge, LaunchOptions::default()).await;

    // THEN: Invalid credentials, failed state, no load, no second attempt
    assert!(matches!(result, Err(LaunchError::InvalidCredentials { .. })), "{:?}", result);
    assert_eq!(bridge.state(), LaunchState::Failed);
    assert!(host.loads().is_empty());
    assert_eq!(authentication_attempts(&server).await, 1);
}

#[tokio::test]
async fn given_server_error_when_launching_then_http_error_with_status() {
    let server = server_responding_with(ResponseTemplate::new(500)).await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    let result = launch_and_wait(&bridge, LaunchOptions::default()).await;

    let error = result.expect_err("Launch should fail");
    assert_eq!(error.response_code(), Some(500));
    assert!(error.is_retryable());
    assert!(matches!(error, LaunchError::Http { .. }));
    assert!(host.loads().is_empty());
    assert_eq!(authentication_attempts(&server).await, 1);
}

#[tokio::test]
async fn given_redirect_without_location_when_launching_then_http_error() {
    let server = server_responding_with(ResponseTemplate::new(302)).await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    let result = launch_and_wait(&bridge, LaunchOptions::default()).await;

    assert!(matches!(result, Err(LaunchError::Http { .. })), "{:?}", result);
    assert_eq!(bridge.state(), LaunchState::Failed);
}

#[tokio::test]
async fn given_success_with_location_when_launching_then_loads_location() {
    let server =
        server_responding_with(ResponseTemplate::new(200).insert_header("Location", "/session/abc")).await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    let result = launch_and_wait(&bridge, LaunchOptions::default()).await;

    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(host.loads()[0].0, session_url(&server));
}

#[tokio::test]
async fn given_unreachable_endpoint_when_launching_then_network_error() {
    // Port 9 (discard) is not expected to be listening on CI machines
    let host = RecordingHost::new();
    let config = BridgeConfig::new(TEST_CLIENT_ID, "http://127.0.0.1:9")
        .with_request_timeout(Duration::from_secs(5));
    let bridge = Bridge::new(config, host.clone()).unwrap();

    let result = launch_and_wait(&bridge, LaunchOptions::default()).await;

    assert!(matches!(result, Err(LaunchError::Network { .. })), "{:?}", result);
    assert!(result.unwrap_err().is_retryable());
}

/// **VALUE**: Verifies a second launch while authenticating is rejected synchronously.
///
/// **WHY THIS MATTERS**: Two concurrent launches would race two session URLs into
/// the same content host, and whichever finished last would win.
///
/// **BUG THIS CATCHES**: Would catch the state check happening after the request
/// is sent, or the rejection being delivered asynchronously (or not at all).
#[tokio::test]
async fn given_launch_in_flight_when_launching_again_then_rejected_synchronously() {
    // GIVEN: A slow endpoint that must be hit exactly once
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/session/abc")
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    // WHEN: Launching twice without waiting
    let (first_tx, first_rx) = oneshot::channel();
    bridge.launch(Credentials::new(TEST_TOKEN), LaunchOptions::default(), move |result| {
        let _ = first_tx.send(result);
    });
    assert_eq!(bridge.state(), LaunchState::Authenticating);

    let (second_tx, mut second_rx) = oneshot::channel();
    bridge.launch(Credentials::new(TEST_TOKEN), LaunchOptions::default(), move |result| {
        let _ = second_tx.send(result);
    });

    // THEN: The second completion already ran with an invalid-state error
    let second = second_rx.try_recv().expect("rejection should be synchronous");
    assert!(matches!(
        second,
        Err(LaunchError::InvalidState {
            state: LaunchState::Authenticating,
            ..
        })
    ));

    // THEN: The first launch still completes and loads once
    let first = first_rx.await.unwrap();
    assert!(first.is_ok(), "{:?}", first);
    assert_eq!(host.loads().len(), 1);
}

#[tokio::test]
async fn given_failed_launch_when_launching_again_then_accepted() {
    // GIVEN: A launch that failed
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/session/abc"))
        .mount(&server)
        .await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);
    assert!(launch_and_wait(&bridge, LaunchOptions::default()).await.is_err());
    assert_eq!(bridge.state(), LaunchState::Failed);

    // WHEN: Retrying
    let retry = launch_and_wait(&bridge, LaunchOptions::default()).await;

    // THEN: Accepted and loaded
    assert!(retry.is_ok(), "{:?}", retry);
    assert_eq!(bridge.state(), LaunchState::Loaded);
}

#[tokio::test]
async fn given_loaded_bridge_when_launching_again_then_rejected() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);
    launch_and_wait(&bridge, LaunchOptions::default()).await.unwrap();

    let result = launch_and_wait(&bridge, LaunchOptions::default()).await;

    assert!(matches!(
        result,
        Err(LaunchError::InvalidState {
            state: LaunchState::Loaded,
            ..
        })
    ));
    assert_eq!(host.loads().len(), 1);
}

#[tokio::test]
async fn given_launch_async_when_awaited_then_loads_without_dispatch() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    let result = bridge
        .launch_async(Credentials::new(TEST_TOKEN), LaunchOptions::default())
        .await;

    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(host.loads().len(), 1);
    assert_eq!(host.dispatch_count(), 0);
}

/// **VALUE**: Verifies a dropped `launch_async` future does not wedge the bridge.
///
/// **WHY THIS MATTERS**: Callers routinely wrap the launch in `tokio::time::timeout`
/// or race it in `select!`. The state moves to `Authenticating` before the first
/// await, so a dropped future must move it back out.
///
/// **BUG THIS CATCHES**: Would catch the bridge staying in `Authenticating` with
/// nothing in flight, rejecting every later launch with an invalid-state error.
#[tokio::test]
async fn given_launch_async_dropped_when_launching_again_then_accepted() {
    // GIVEN: An endpoint slower than the caller is willing to wait
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VERIFY_TOKEN_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/session/abc")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    // WHEN: The awaiting caller gives up before authentication finishes
    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        bridge.launch_async(Credentials::new(TEST_TOKEN), LaunchOptions::default()),
    )
    .await;
    assert!(abandoned.is_err(), "launch should still be pending at the timeout");

    // THEN: The abandoned launch counts as failed and nothing was loaded
    assert_eq!(bridge.state(), LaunchState::Failed);
    assert!(host.loads().is_empty());

    // THEN: A new launch is accepted and completes
    let retry = launch_and_wait(&bridge, LaunchOptions::default()).await;
    assert!(retry.is_ok(), "{:?}", retry);
    assert_eq!(bridge.state(), LaunchState::Loaded);
    assert_eq!(host.loads().len(), 1);
}

#[test]
fn given_no_runtime_when_creating_bridge_then_error() {
    let config = BridgeConfig::new(TEST_CLIENT_ID, "https://content.example.com");

    let result = Bridge::new(config, RecordingHost::new());

    assert!(result.is_err());
}
