use crate::bridge_tests::helpers::{
    RecordingHost, TEST_CLIENT_ID, command_payloads, create_bridge, launch_and_wait,
    launched_bridge, session_url, start_auth_server,
};

use bridge_core::{
    Bridge, BridgeConfig, Diagnostics, InterceptDecision, InterceptedRequest, LaunchOptions,
    RequestInterceptor,
};
use models::HeaderSet;

use std::sync::Arc;

use serde_json::json;

/// **VALUE**: Verifies launch headers follow the content onto its sub-resource requests.
///
/// **WHY THIS MATTERS**: The backend ties every content request to the session
/// through these headers. A sub-resource without them is served as anonymous.
///
/// **BUG THIS CATCHES**: Would catch the interceptor being installed before the
/// context is shared, or reading a copy taken at bridge creation.
#[tokio::test]
async fn given_launch_headers_when_content_requests_subresource_then_headers_added() {
    // GIVEN: A bridge launched with a session header
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let _bridge = launched_bridge(&server, &host, HeaderSet::from([("X-Session-Tag", "abc")])).await;

    // WHEN: The content fetches a script
    let decision = host.simulate_request(
        "GET",
        &format!("{}/assets/app.js", server.uri()),
        &HeaderSet::from([("Accept", "*/*")]),
    );

    // THEN: The session header is added alongside the request's own
    assert_eq!(
        decision,
        InterceptDecision::Augment(HeaderSet::from([("Accept", "*/*"), ("X-Session-Tag", "abc")]))
    );
}

#[tokio::test]
async fn given_post_from_content_when_intercepted_then_passthrough() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let _bridge = launched_bridge(&server, &host, HeaderSet::from([("X-Session-Tag", "abc")])).await;

    let decision = host.simulate_request("POST", &format!("{}/api/save", server.uri()), &HeaderSet::new());

    assert_eq!(decision, InterceptDecision::Passthrough);
}

/// **VALUE**: Verifies update_headers replaces the set instead of merging into it.
///
/// **WHY THIS MATTERS**: Hosts remove headers by sending a set without them. A
/// merge would keep sending a revoked header for the rest of the session.
///
/// **BUG THIS CATCHES**: Would catch `set_headers` being implemented with `merge`,
/// or the instrumentation script and command not being reissued.
#[tokio::test]
async fn given_update_headers_when_content_requests_then_only_new_headers_apply() {
    // GIVEN: A launched bridge with an initial header
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::from([("X-Old", "1")])).await;
    host.clear_scripts();

    // WHEN: Replacing the headers
    bridge
        .update_headers(HeaderSet::from([("X-New", "2")]))
        .unwrap();

    // THEN: Sub-resources get only the new header
    let decision = host.simulate_request("GET", &format!("{}/page", server.uri()), &HeaderSet::new());
    assert_eq!(decision, InterceptDecision::Augment(HeaderSet::from([("X-New", "2")])));
    assert_eq!(bridge.request_context().headers, HeaderSet::from([("X-New", "2")]));

    // THEN: The script table and the content both hear about it
    let scripts = host.scripts();
    assert!(scripts.iter().any(|script| script.contains(r#"})({"X-New":"2"});"#)));
    assert_eq!(
        command_payloads(&host),
        vec![json!({"type": "update_headers", "headers": {"X-New": "2"}})]
    );
}

/// **VALUE**: Verifies every load-start reinstalls the header instrumentation.
///
/// **BUG THIS CATCHES**: Would catch the script being evaluated only once per
/// launch, losing the headers on the first in-content navigation.
#[tokio::test]
async fn given_loaded_bridge_when_load_started_then_instrumentation_reissued() {
    // GIVEN: A launched bridge
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::from([("X-Session-Tag", "abc")])).await;
    host.clear_scripts();

    // WHEN: Two navigations start
    bridge.on_load_started(&session_url(&server));
    bridge.on_load_started(&session_url(&server));

    // THEN: One instrumentation script per navigation
    let scripts = host.scripts();
    assert_eq!(scripts.len(), 2);
    assert!(scripts.iter().all(|script| script.contains(r#"{"X-Session-Tag":"abc"}"#)));
}

#[tokio::test]
async fn given_idle_bridge_when_load_started_then_nothing_evaluated() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    bridge.on_load_started(&session_url(&server));

    assert!(host.scripts().is_empty());
}

#[tokio::test]
async fn given_timezone_and_theme_updates_when_loaded_then_context_changes_without_command() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;
    host.clear_scripts();

    bridge.update_timezone("America/Toronto").unwrap();
    bridge.update_theme("light").unwrap();

    let context = bridge.request_context();
    assert_eq!(context.timezone.as_deref(), Some("America/Toronto"));
    assert_eq!(context.theme.as_deref(), Some("light"));
    assert!(host.scripts().is_empty());
    assert!(host.loads().len() == 1, "updates must not reload the content");
}

/// **VALUE**: Verifies configured diagnostics run on the bridge's re-sent requests.
///
/// **WHY THIS MATTERS**: Hosts plug in diagnostics to tag or inspect the content
/// traffic carrying session headers. They must see the same header set the
/// content host will send.
///
/// **BUG THIS CATCHES**: Would catch the config's diagnostics never reaching the
/// installed interceptor, or running on requests the bridge passes through.
#[tokio::test]
async fn given_diagnostics_in_config_when_content_requests_then_interceptors_applied() {
    // GIVEN: A bridge whose config carries a header-adding interceptor
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let tag_requests: RequestInterceptor = Arc::new(|request: &InterceptedRequest<'_>| {
        let mut headers = request.headers.clone();
        headers.insert("X-Diagnostics", request.method);
        InterceptDecision::Augment(headers)
    });
    let config = BridgeConfig::new(TEST_CLIENT_ID, server.uri())
        .with_diagnostics(Diagnostics::new().with_interceptor(tag_requests));
    let bridge = Bridge::new(config, host.clone()).unwrap();
    launch_and_wait(
        &bridge,
        LaunchOptions::default().with_headers(HeaderSet::from([("X-Session-Tag", "abc")])),
    )
    .await
    .unwrap();

    // WHEN: The content fetches a GET and a POST
    let get = host.simulate_request("GET", &format!("{}/assets/app.js", server.uri()), &HeaderSet::new());
    let post = host.simulate_request("POST", &format!("{}/api/save", server.uri()), &HeaderSet::new());

    // THEN: Only the re-sent GET carries the diagnostics header, after the session one
    assert_eq!(
        get,
        InterceptDecision::Augment(HeaderSet::from([
            ("X-Session-Tag", "abc"),
            ("X-Diagnostics", "GET"),
        ]))
    );
    assert_eq!(post, InterceptDecision::Passthrough);
}
