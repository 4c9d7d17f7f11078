use crate::bridge::LaunchState;

/// **VALUE**: Pins which states accept a launch and which accept commands.
///
/// **WHY THIS MATTERS**: These two predicates are the whole concurrency story of
/// the bridge. Allowing a launch while authenticating lets two session URLs race
/// to the content host.
///
/// **BUG THIS CATCHES**: Would catch `Authenticating` or `Loaded` being added to
/// `can_launch`, or `Failed` being treated as loaded.
#[test]
fn given_each_state_when_checked_then_launch_and_command_gates_match() {
    // GIVEN: (state, can launch, is loaded)
    let table = [
        (LaunchState::Idle, true, false),
        (LaunchState::Authenticating, false, false),
        (LaunchState::Loaded, false, true),
        (LaunchState::Ready, false, true),
        (LaunchState::Failed, true, false),
    ];

    // WHEN/THEN
    for (state, can_launch, is_loaded) in table {
        assert_eq!(state.can_launch(), can_launch, "can_launch for {state}");
        assert_eq!(state.is_loaded(), is_loaded, "is_loaded for {state}");
    }
}

#[test]
fn given_state_when_displayed_then_lowercase_name() {
    assert_eq!(LaunchState::Authenticating.to_string(), "authenticating");
    assert_eq!(LaunchState::Ready.to_string(), "ready");
}
