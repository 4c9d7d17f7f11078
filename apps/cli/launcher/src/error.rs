use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the launcher binary.
///
/// Serializable so the final launch report can carry them verbatim.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum LauncherError {
    /// Error from this app
    #[error("Launcher Error: {message} {location}")]
    Launcher {
        message: String,
        location: ErrorLocation,
    },

    /// Error from bridge-core (config, launch, commands)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Missing or malformed environment input
    #[error("Environment Error: {message} {location}")]
    Environment {
        message: String,
        location: ErrorLocation,
    },

    /// The session page could not be fetched
    #[error("Load Error: {message} {location}")]
    Load {
        message: String,
        location: ErrorLocation,
    },
}

impl LauncherError {
    #[track_caller]
    pub fn core(error: impl std::fmt::Display) -> Self {
        LauncherError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }

    #[track_caller]
    pub fn environment(message: impl Into<String>) -> Self {
        LauncherError::Environment {
            message: message.into(),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}
