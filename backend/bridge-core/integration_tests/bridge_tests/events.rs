use crate::bridge_tests::helpers::{
    RecordingHost, command_payloads, create_bridge, launched_bridge, start_auth_server,
};

use bridge_core::LaunchState;
use common::Credentials;
use models::{Event, HeaderSet, RequestId};

use std::sync::{Arc, Mutex};

use serde_json::json;

fn collecting_listener() -> (Arc<Mutex<Vec<Event>>>, Arc<dyn bridge_core::EventListener>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let listener: Arc<dyn bridge_core::EventListener> =
        Arc::new(move |event: &Event| sink.lock().unwrap().push(event.clone()));
    (events, listener)
}

/// **VALUE**: Verifies the credential refresh round trip end to end.
///
/// **WHY THIS MATTERS**: Long sessions outlive their token. The content asks for a
/// new one with a requestId and blocks until a reply with the same id arrives.
///
/// **BUG THIS CATCHES**: Would catch the listener not being called, the reply
/// carrying a different id, or the context keeping the stale token.
#[tokio::test]
async fn given_credentials_expired_when_host_replies_then_request_id_echoed() {
    // GIVEN: A launched bridge with a listener
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;
    let (events, listener) = collecting_listener();
    bridge.register_listener(listener);

    // WHEN: The content reports expiry and the host answers
    let event = bridge
        .receive_message(r#"{"type":"credentials_expired","requestId":"req-9"}"#)
        .unwrap();
    let request_id = event.request_id().cloned().unwrap();
    bridge
        .update_credentials(request_id, Credentials::new("rotated-token"))
        .unwrap();

    // THEN: The listener saw the event and the reply matches it
    assert_eq!(
        *events.lock().unwrap(),
        vec![Event::CredentialsExpired {
            request_id: RequestId::new("req-9")
        }]
    );
    assert_eq!(
        command_payloads(&host),
        vec![json!({"type": "update_credentials", "requestId": "req-9", "token": "rotated-token"})]
    );
    assert_eq!(
        bridge.request_context().credentials,
        Some(Credentials::new("rotated-token"))
    );
}

/// **VALUE**: Verifies `content_loaded` moves the bridge to Ready before listeners run.
///
/// **BUG THIS CATCHES**: Would catch the transition being skipped, or a listener
/// observing `Loaded` while handling the very event that makes the bridge ready.
#[tokio::test]
async fn given_content_loaded_telemetry_when_received_then_ready() {
    // GIVEN: A launched bridge and a listener recording the state it sees
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;
    let seen = Arc::new(Mutex::new(None));
    let seen_sink = Arc::clone(&seen);
    let observer = bridge.clone();
    bridge.register_listener(Arc::new(move |_: &Event| {
        *seen_sink.lock().unwrap() = Some(observer.state());
    }));

    // WHEN: The content reports it is interactive
    bridge.receive_message(r#"{"type":"telemetry","name":"content_loaded","metadata":{}}"#);

    // THEN
    assert_eq!(bridge.state(), LaunchState::Ready);
    assert_eq!(*seen.lock().unwrap(), Some(LaunchState::Ready));
}

#[tokio::test]
async fn given_other_telemetry_when_received_then_state_unchanged() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;

    let event = bridge.receive_message(r#"{"type":"telemetry","name":"tab_opened"}"#);

    assert!(event.is_some());
    assert_eq!(bridge.state(), LaunchState::Loaded);
}

#[tokio::test]
async fn given_content_loaded_before_launch_when_received_then_still_idle() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    bridge.receive_message(r#"{"type":"telemetry","name":"content_loaded"}"#);

    assert_eq!(bridge.state(), LaunchState::Idle);
}

#[tokio::test]
async fn given_malformed_message_when_received_then_listeners_not_called() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = launched_bridge(&server, &host, HeaderSet::new()).await;
    let (events, listener) = collecting_listener();
    bridge.register_listener(listener);

    assert!(bridge.receive_message("{\"type\":").is_none());
    assert!(bridge.receive_message(r#"{"type":"share"}"#).is_none());

    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn given_unregistered_listener_when_message_received_then_not_called() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);
    let (events, listener) = collecting_listener();
    let id = bridge.register_listener(listener);

    assert!(bridge.unregister_listener(id));
    bridge.receive_message(r#"{"type":"exit_requested"}"#);

    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn given_share_event_when_received_then_text_and_url_joined() {
    let server = start_auth_server().await;
    let host = RecordingHost::new();
    let bridge = create_bridge(&server, &host);

    let event = bridge.receive_message(
        r#"{"type":"share","text":"Look","title":"Trip","url":"https://content.example.com/s/1"}"#,
    );

    assert_eq!(
        event,
        Some(Event::Share {
            text: "Look\nhttps://content.example.com/s/1".to_string(),
            title: Some("Trip".to_string()),
        })
    );
}
