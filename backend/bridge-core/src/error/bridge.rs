use crate::bridge::LaunchState;

use common::ErrorLocation;
use models::ModelError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BridgeError {
    #[error("Not Loaded Error: {operation} requires loaded content, bridge is {state} {location}")]
    NotLoaded {
        operation: &'static str,
        state: LaunchState,
        location: ErrorLocation,
    },

    #[error("Command Encode Error: {message} {location}")]
    CommandEncode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Runtime Error: {message} {location}")]
    Runtime {
        message: String,
        location: ErrorLocation,
    },
}

impl BridgeError {
    #[track_caller]
    pub fn not_loaded(operation: &'static str, state: LaunchState) -> Self {
        BridgeError::NotLoaded {
            operation,
            state,
            location: ErrorLocation::here(),
        }
    }
}

impl From<ModelError> for BridgeError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        BridgeError::CommandEncode {
            message: error.to_string(),
            location: ErrorLocation::here(),
        }
    }
}
