use crate::error::LauncherError;

use bridge_core::LaunchState;
use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use url::Url;

/// Outcome of one launcher run, printed to stdout as JSON.
#[derive(Debug, Serialize)]
pub struct LaunchReport {
    pub state: LaunchState,
    /// Path of the session URL. The query is left out; it may carry secrets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LauncherError>,
}

impl LaunchReport {
    pub fn loaded(state: LaunchState, session_url: Option<&Url>, page_status: u16) -> Self {
        Self {
            state,
            session_path: session_url.map(|url| url.path().to_string()),
            page_status: Some(page_status),
            error: None,
        }
    }

    pub fn failed(state: LaunchState, error: LauncherError) -> Self {
        Self {
            state,
            session_path: None,
            page_status: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.page_status.is_some_and(|status| (200..400).contains(&status))
    }

    pub fn to_json(&self) -> Result<String, LauncherError> {
        serde_json::to_string_pretty(self).map_err(|e| LauncherError::Launcher {
            message: format!("Failed to serialize launch report: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
