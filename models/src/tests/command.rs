use crate::{Command, HeaderSet, Locale, RequestId};

use common::Credentials;

use serde_json::{Value, json};

/// **VALUE**: Verifies that a credential reply echoes the request id and token.
///
/// **WHY THIS MATTERS**: The content parks its failed request until it sees a
/// reply with the same `requestId`. A mismatch leaves the user stuck.
///
/// **BUG THIS CATCHES**: Would catch the id being renamed or the token being
/// redacted in the payload.
#[test]
fn given_update_credentials_when_encoded_then_carries_request_id_and_token() {
    // GIVEN: A reply to a credentials_expired event
    let command = Command::UpdateCredentials {
        request_id: RequestId::new("uuid"),
        credentials: Credentials::new("new token"),
    };

    // WHEN: Converting to the wire value
    let value = command.to_value();

    // THEN: Tag, id and token are present
    assert_eq!(
        value,
        json!({"type": "update_credentials", "requestId": "uuid", "token": "new token"})
    );
    assert_eq!(command.request_id(), Some(&RequestId::new("uuid")));
}

#[test]
fn given_update_locale_when_encoded_then_uses_language_tag() {
    let command = Command::UpdateLocale {
        locale: Locale::new("fr").with_region("CA"),
    };

    let encoded = command.encode().unwrap();
    let value: Value = serde_json::from_str(&encoded).unwrap();

    assert_eq!(value, json!({"type": "update_locale", "locale": "fr-CA"}));
}

#[test]
fn given_headers_and_navigation_when_encoded_then_have_no_request_id() {
    let headers = Command::UpdateHeaders {
        headers: HeaderSet::from([("X-Tenant", "acme")]),
    };
    let navigate = Command::NavigateTo {
        location: String::from("500 miles away"),
    };

    assert_eq!(
        headers.to_value(),
        json!({"type": "update_headers", "headers": {"X-Tenant": "acme"}})
    );
    assert_eq!(
        navigate.to_value(),
        json!({"type": "navigate_to", "location": "500 miles away"})
    );
    assert!(headers.request_id().is_none());
    assert!(navigate.request_id().is_none());
}

#[test]
fn given_account_request_failed_when_encoded_then_includes_reason() {
    let command = Command::AccountRequestFailed {
        request_id: RequestId::new("acc-1"),
        reason: String::from("declined"),
    };

    assert_eq!(
        command.to_value(),
        json!({"type": "account_request_failed", "requestId": "acc-1", "reason": "declined"})
    );
}
