use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line and column.
///
/// **WHY THIS MATTERS**: Every error in the bridge carries an `ErrorLocation`. If it
/// stops capturing call sites, launch failures in the log lose their origin.
///
/// **BUG THIS CATCHES**: Would catch if `Location::caller()` propagation breaks or
/// the field extraction is changed.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: An ErrorLocation built on a known line
    let (location, line) = (ErrorLocation::from(Location::caller()), line!());

    // THEN: Should capture file, line and column
    assert!(location.file.contains("error_location.rs"), "Should capture file path");
    assert_eq!(location.line, line, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the `[file:line:column]` Display format.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops the brackets or
/// one of the three components, which log greps depend on.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: Should be bracketed with two colons
    assert!(formatted.starts_with('['));
    assert!(formatted.ends_with(']'));
    assert_eq!(formatted.matches(':').count(), 2);
}

#[track_caller]
fn fail_here() -> ErrorLocation {
    ErrorLocation::here()
}

#[test]
fn given_tracked_helper_when_here_called_then_points_at_helper_caller() {
    let (location, line) = (fail_here(), line!());

    assert_eq!(location.line, line);
}
