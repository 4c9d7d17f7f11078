use crate::Credentials;

/// **VALUE**: Verifies that bearer tokens never leak through formatting.
///
/// **WHY THIS MATTERS**: Launch failures and state transitions are logged with
/// `{:?}`. A token printed there ends up in the log file on disk.
///
/// **BUG THIS CATCHES**: Would catch a derived `Debug` replacing the manual impl.
#[test]
fn given_credentials_when_formatted_then_token_is_redacted() {
    // GIVEN: Credentials with a recognizable token
    let credentials = Credentials::new("id token secret");

    // WHEN: Formatting with Debug and Display
    let debug = format!("{:?}", credentials);
    let display = format!("{}", credentials);

    // THEN: Neither contains the token
    assert!(!debug.contains("secret"));
    assert!(!display.contains("secret"));
    assert_eq!(credentials.token(), "id token secret");
    assert_eq!(credentials.len(), 15);
}

/// **VALUE**: Verifies that credentials refuse implicit serialization.
///
/// **BUG THIS CATCHES**: Would catch a struct embedding `Credentials` being
/// serialized straight into a command payload or a config file.
#[test]
fn given_credentials_when_serialized_then_fails() {
    // GIVEN: Credentials
    let credentials = Credentials::new("token");

    // WHEN: Serializing
    let result = serde_json::to_string(&credentials);

    // THEN: Serialization is refused
    assert!(result.is_err(), "Credentials must not serialize implicitly");
}

#[test]
fn given_credentials_when_serialized_then_error_names_type_not_token() {
    let credentials = Credentials::new("very-secret-token");

    let message = serde_json::to_string(&credentials).unwrap_err().to_string();

    assert!(message.contains("Credentials"));
    assert!(!message.contains("very-secret-token"));
}
