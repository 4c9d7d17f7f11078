use crate::error::LauncherError;
use crate::report::LaunchReport;

use bridge_core::LaunchState;

use url::Url;

/// **VALUE**: Verifies the report never includes the session query string.
///
/// **WHY THIS MATTERS**: Session URLs commonly carry one-time tokens in the query.
/// The report goes to stdout and from there into CI logs.
///
/// **BUG THIS CATCHES**: Would catch `session_path` being filled from `as_str()`.
#[test]
fn given_session_url_with_query_when_reporting_then_only_path_is_kept() {
    // GIVEN: A session URL with a secret in the query
    let url = Url::parse("https://content.example.com/session/abc?otp=secret").unwrap();

    // WHEN: Building and serializing the report
    let report = LaunchReport::loaded(LaunchState::Loaded, Some(&url), 200);
    let json = report.to_json().unwrap();

    // THEN
    assert!(json.contains("/session/abc"));
    assert!(!json.contains("secret"));
    assert!(report.is_success());
}

#[test]
fn given_failure_when_reporting_then_error_included_and_not_success() {
    let report = LaunchReport::failed(LaunchState::Failed, LauncherError::environment("BRIDGE_ID_TOKEN is not set"));

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert!(!report.is_success());
    assert_eq!(value["state"], "Failed");
    assert_eq!(value["error"]["type"], "Environment");
    assert!(value.get("page_status").is_none());
}

#[test]
fn given_error_status_page_when_reporting_then_not_success() {
    let report = LaunchReport::loaded(LaunchState::Loaded, None, 404);

    assert!(!report.is_success());
}
