use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

/// Errors building a bridge from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `bridge.json` does not exist. There is no default client id to fall back to.
    #[error("Bridge Config Missing Error: {path} {location}")]
    NotFound {
        location: ErrorLocation,
        path: PathBuf,
    },

    #[error("Bridge Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bridge Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    /// Creating the directory, writing the temp file or renaming it failed.
    #[error("Bridge Config Write Error: {path}: {source} {location}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bridge Config Serialization Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },

    /// A value is out of range, or the base URL cannot host the auth endpoint.
    #[error("Bridge Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },

    /// The HTTP client for the credential exchange could not be built.
    #[error("HTTP Client Error: {reason} {location}")]
    HttpClient {
        location: ErrorLocation,
        reason: String,
    },
}
