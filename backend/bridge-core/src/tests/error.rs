use crate::bridge::LaunchState;
use crate::error::{BridgeError, LaunchError};

use models::ModelError;

/// **VALUE**: Verifies launch errors carry the caller location and a usable category.
///
/// **WHY THIS MATTERS**: Launch failures surface far from where they were created
/// (through a completion callback on another thread). The location in the message
/// is the only pointer back to the source.
///
/// **BUG THIS CATCHES**: Would catch a constructor losing `#[track_caller]`, which
/// makes every location point into the error module.
#[test]
fn given_launch_errors_when_displayed_then_include_caller_location() {
    // GIVEN: Errors built here
    let invalid = LaunchError::invalid_credentials();
    let http = LaunchError::http(503, "authentication failed");

    // WHEN: Rendering them
    let invalid_message = invalid.to_string();
    let http_message = http.to_string();

    // THEN: Both point at this test file
    assert!(invalid_message.starts_with("Invalid Credentials Error:"));
    assert!(invalid_message.contains("tests/error.rs"));
    assert!(http_message.contains("status 503"));
    assert!(http_message.contains("tests/error.rs"));
}

#[test]
fn given_launch_errors_when_classified_then_categories_and_retry_hints_match() {
    let invalid = LaunchError::invalid_credentials();
    let not_found = LaunchError::http(404, "authentication failed");
    let unavailable = LaunchError::http(503, "authentication failed");
    let busy = LaunchError::invalid_state(LaunchState::Authenticating);

    assert_eq!(invalid.error_category(), "invalid_credentials");
    assert_eq!(invalid.response_code(), Some(422));
    assert!(!invalid.is_retryable());

    assert_eq!(not_found.error_category(), "client_error");
    assert!(!not_found.is_retryable());

    assert_eq!(unavailable.error_category(), "server_error");
    assert_eq!(unavailable.response_code(), Some(503));
    assert!(unavailable.is_retryable());

    assert_eq!(busy.error_category(), "invalid_state");
    assert_eq!(busy.response_code(), None);
    assert!(busy.to_string().contains("authenticating"));
}

#[test]
fn given_model_error_when_converted_then_becomes_command_encode() {
    let error: BridgeError = ModelError::validation("bad payload").into();

    assert!(matches!(error, BridgeError::CommandEncode { ref message, .. } if message.contains("bad payload")));
}

#[test]
fn given_not_loaded_error_when_displayed_then_names_operation_and_state() {
    let error = BridgeError::not_loaded("navigate_to", LaunchState::Idle);

    let message = error.to_string();

    assert!(message.contains("navigate_to"));
    assert!(message.contains("idle"));
}
