use crate::bridge_tests::helpers::{
    RecordingHost, command_payloads, create_bridge, launched_bridge, start_auth_server,
};

use bridge_core::{BridgeError, LaunchState};
use common::Credentials;
use models::{HeaderSet, Locale, RequestId};

use serde_json::json;

/// **VALUE**: Verifies commands issued before the content is loaded are rejected.
///
/// **WHY THIS MATTERS**: Before the session loads, the page that would run the
/// command script is not the content. Evaluating it there is at best lost and at
/// worst runs against an unrelated page.
///
/// **BUG THIS CATCHES**: Would catch a command path that skips the loaded check.
#[tokio::test]
async fn given_idle_bridge_when_sending_commands_then_not_loaded() {
    // GIVEN: A bridge that never launched
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    // WHEN: Issuing every command
    let results = vec![
        bridge.update_locale(Locale::new("de")),
        bridge.update_timezone("Europe/Berlin"),
        bridge.update_theme("dark"),
        bridge.update_headers(HeaderSet::new()),
        bridge.update_credentials(RequestId::new("r"), Credentials::new("t")),
        bridge.account_provision_initiated(RequestId::new("r")),
        bridge.account_request_succeeded(RequestId::new("r")),
        bridge.account_request_failed(RequestId::new("r"), "declined"),
        bridge.navigate_to("/home"),
    ];

    // THEN: All rejected, nothing evaluated
    for result in results {
        assert!(
            matches!(
                result,
                Err(BridgeError::NotLoaded {
                    state: LaunchState::Idle,
                    ..
                })
            ),
            "{:?}",
            result
        );
    }
    assert!(host.scripts().is_empty());
}

#[tokio::test]
async fn given_loaded_bridge_when_updating_locale_then_command_and_context_updated() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;

    bridge
        .update_locale(Locale::new("pt").with_region("br"))
        .unwrap();

    assert_eq!(
        command_payloads(&host),
        vec![json!({"type": "update_locale", "locale": "pt-BR"})]
    );
    assert_eq!(
        bridge.request_context().locale,
        Some(Locale::new("pt").with_region("BR"))
    );
}

/// **VALUE**: Verifies account replies echo the requestId they answer.
///
/// **BUG THIS CATCHES**: Would catch success and failure replies sharing one tag,
/// or the failure reason being dropped.
#[tokio::test]
async fn given_account_request_when_replying_then_request_id_echoed() {
    // GIVEN: A launched bridge
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;

    // WHEN: Replying to three requests
    bridge
        .account_provision_initiated(RequestId::new("prov-1"))
        .unwrap();
    bridge
        .account_request_succeeded(RequestId::new("acc-1"))
        .unwrap();
    bridge
        .account_request_failed(RequestId::new("acc-2"), "user cancelled")
        .unwrap();

    // THEN: Each reply carries its own id
    assert_eq!(
        command_payloads(&host),
        vec![
            json!({"type": "account_provision_initiated", "requestId": "prov-1"}),
            json!({"type": "account_request_succeeded", "requestId": "acc-1"}),
            json!({"type": "account_request_failed", "requestId": "acc-2", "reason": "user cancelled"}),
        ]
    );
}

#[tokio::test]
async fn given_navigate_to_when_loaded_then_command_sent_and_location_recorded() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;

    bridge.navigate_to("/dreams/7").unwrap();

    assert_eq!(
        command_payloads(&host),
        vec![json!({"type": "navigate_to", "location": "/dreams/7"})]
    );
    assert_eq!(bridge.request_context().location.as_deref(), Some("/dreams/7"));
}

#[tokio::test]
async fn given_custom_namespace_when_sending_then_script_targets_it() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let config = bridge_core::BridgeConfig::new("sample-client", server.uri())
        .with_script_namespace("hostBridge");
    let bridge = bridge_core::Bridge::new(config, host.clone()).unwrap();
    bridge
        .launch_async(Credentials::new("t"), Default::default())
        .await
        .unwrap();

    bridge.navigate_to("/x").unwrap();

    let scripts = host.scripts();
    assert!(scripts.last().unwrap().starts_with("window.hostBridge && "));
}

#[tokio::test]
async fn given_host_history_when_going_back_then_delegates_to_host() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    assert!(!bridge.can_go_back());
    host.set_has_history(true);
    assert!(bridge.can_go_back());

    bridge.go_back();
    assert_eq!(host.back_navigations(), 1);
}
