use crate::channel::outbound::command_script;

use common::Credentials;
use models::{Command, RequestId};

use serde_json::{Value, json};

fn payload_of(script: &str, namespace: &str) -> Value {
    let prefix = format!("window.{namespace}.receive(");
    let start = script.rfind(&prefix).unwrap() + prefix.len();
    let end = script.rfind(");").unwrap();
    serde_json::from_str(&script[start..end]).unwrap()
}

/// **VALUE**: Verifies a credentials reply is delivered to the namespace with its requestId.
///
/// **WHY THIS MATTERS**: The content matches replies to its pending requests by id.
/// A reply with the wrong id leaves the content waiting for a token forever.
///
/// **BUG THIS CATCHES**: Would catch the namespace being hardcoded or the
/// `requestId` key being renamed.
#[test]
fn given_update_credentials_when_scripted_then_guarded_call_with_request_id() {
    // GIVEN: A credentials reply
    let command = Command::UpdateCredentials {
        request_id: RequestId::new("req-42"),
        credentials: Credentials::new("fresh-token"),
    };

    // WHEN: Building the delivery script
    let script = command_script("hostBridge", &command).unwrap();

    // THEN: It is guarded and carries the payload
    assert!(script.starts_with("window.hostBridge && typeof window.hostBridge.receive === \"function\""));
    assert_eq!(
        payload_of(&script, "hostBridge"),
        json!({"type": "update_credentials", "requestId": "req-42", "token": "fresh-token"})
    );
}

#[test]
fn given_navigate_to_when_scripted_then_location_payload() {
    let command = Command::NavigateTo {
        location: "/dreams/new".to_string(),
    };

    let script = command_script("contentBridge", &command).unwrap();

    assert_eq!(
        payload_of(&script, "contentBridge"),
        json!({"type": "navigate_to", "location": "/dreams/new"})
    );
}
