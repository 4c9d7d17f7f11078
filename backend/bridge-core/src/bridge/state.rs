use std::fmt;

use serde::Serialize;

/// Launch lifecycle of one bridge.
///
/// ```text
/// Idle -> Authenticating -> Loaded -> Ready
///              |
///              +-> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LaunchState {
    Idle,
    Authenticating,
    /// Session URL handed to the content host.
    Loaded,
    /// The content reported `content_loaded`.
    Ready,
    /// The last launch failed. A new launch may be attempted.
    Failed,
}

impl LaunchState {
    /// States from which `launch` is accepted.
    pub fn can_launch(&self) -> bool {
        matches!(self, LaunchState::Idle | LaunchState::Failed)
    }

    /// States in which commands may be sent to the content.
    pub fn is_loaded(&self) -> bool {
        matches!(self, LaunchState::Loaded | LaunchState::Ready)
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchState::Idle => "idle",
            LaunchState::Authenticating => "authenticating",
            LaunchState::Loaded => "loaded",
            LaunchState::Ready => "ready",
            LaunchState::Failed => "failed",
        };
        f.write_str(name)
    }
}
