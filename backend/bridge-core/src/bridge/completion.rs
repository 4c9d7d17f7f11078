use crate::error::launch::LaunchError;

use log::{error, info};

/// Outcome passed to a launch completion callback.
pub type LaunchResult = Result<(), LaunchError>;

/// Completion callback used when the caller does not care about the outcome.
///
/// Logs failures; never panics.
pub fn log_launch_result(result: LaunchResult) {
    match result {
        Ok(()) => info!("Launch completed"),
        Err(e) => error!("Failed to launch ({}): {}", e.error_category(), e),
    }
}
