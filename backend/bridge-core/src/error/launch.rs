//! Outcome of a failed launch.
//!
//! Key design decisions:
//! - HTTP status codes stored directly (not parsed from strings)
//! - The core never retries; `is_retryable()` is a hint for the caller
//! - All errors include ErrorLocation for debugging
//! - `#[track_caller]` for automatic location capture

use crate::bridge::LaunchState;

use common::{ErrorLocation, HttpStatusCode};

use thiserror::Error as ThisError;

/// Errors delivered through a launch completion.
#[derive(Debug, ThisError)]
pub enum LaunchError {
    #[error("Invalid Credentials Error: the authentication endpoint rejected the token {location}")]
    InvalidCredentials { location: ErrorLocation },

    #[error("HTTP Error: status {response_code} - {message} {location}")]
    Http {
        response_code: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Network Error: {cause} {location}")]
    Network {
        cause: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("Invalid State Error: cannot launch while {state} {location}")]
    InvalidState {
        state: LaunchState,
        location: ErrorLocation,
    },
}

impl LaunchError {
    #[track_caller]
    pub fn invalid_credentials() -> Self {
        LaunchError::InvalidCredentials {
            location: ErrorLocation::here(),
        }
    }

    #[track_caller]
    pub fn http(response_code: u16, message: impl Into<String>) -> Self {
        LaunchError::Http {
            response_code: HttpStatusCode(response_code),
            message: message.into(),
            location: ErrorLocation::here(),
        }
    }

    #[track_caller]
    pub fn invalid_state(state: LaunchState) -> Self {
        LaunchError::InvalidState {
            state,
            location: ErrorLocation::here(),
        }
    }

    /// Create from a transport failure.
    ///
    /// Redirects are never followed and status codes are inspected before
    /// `error_for_status` could run, so anything arriving here is a transport
    /// problem: DNS, refused connection, reset, timeout, body encoding.
    #[track_caller]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        LaunchError::Network {
            cause: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::here(),
        }
    }

    /// Status code of the authentication response, if one was received.
    pub fn response_code(&self) -> Option<u16> {
        match self {
            LaunchError::Http { response_code, .. } => Some(response_code.0),
            LaunchError::InvalidCredentials { .. } => Some(common::http_status::UNPROCESSABLE_ENTITY),
            LaunchError::Network { .. } | LaunchError::InvalidState { .. } => None,
        }
    }

    /// Whether a caller-driven retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            LaunchError::Network { .. } => true,
            LaunchError::Http { response_code, .. } => response_code.is_server_error(),
            LaunchError::InvalidCredentials { .. } => false,
            LaunchError::InvalidState { .. } => false,
        }
    }

    /// Get error category for logs.
    pub fn error_category(&self) -> &'static str {
        match self {
            LaunchError::InvalidCredentials { .. } => "invalid_credentials",
            LaunchError::Http { response_code, .. } if response_code.is_client_error() => "client_error",
            LaunchError::Http { response_code, .. } if response_code.is_server_error() => "server_error",
            LaunchError::Http { .. } => "http",
            LaunchError::Network { is_timeout: true, .. } => "timeout",
            LaunchError::Network { is_connection: true, .. } => "connection",
            LaunchError::Network { .. } => "network",
            LaunchError::InvalidState { .. } => "invalid_state",
        }
    }
}
