// Unit tests for error module
// Tests error serialization (the launch report embeds errors as JSON)

use crate::error::LauncherError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that errors serialize with their variant tag and message.
///
/// **WHY THIS MATTERS**: Scripts driving the launcher parse its JSON report. If the
/// error shape changes, they can no longer tell a bad token from a network outage.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[derive(Serialize)]` or a change
/// of the `type`/`data` tagging.
#[test]
fn given_launcher_error_when_serialized_then_tagged_with_variant() {
    // GIVEN: A LauncherError
    let err = LauncherError::Load {
        message: String::from("connection reset"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let value = serde_json::to_value(&err).unwrap();

    // THEN: Tag and payload are present
    assert_eq!(value["type"], "Load");
    assert_eq!(value["data"]["message"], "connection reset");
    assert!(value["data"]["location"]["line"].is_number());
}

#[test]
fn given_core_helper_when_wrapping_display_then_keeps_message_and_caller() {
    let err = LauncherError::core("Invalid Credentials Error: rejected");

    let message = err.to_string();

    assert!(message.starts_with("Core Error: Invalid Credentials Error: rejected"));
    assert!(message.contains("tests/error.rs"));
}
