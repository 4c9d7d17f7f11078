//! Shared primitives for the embedded content bridge.
//!
//! Everything here is used by both the pure data layer (`models`) and the
//! protocol layer (`bridge-core`):
//!
//! - [`ErrorLocation`] for `#[track_caller]` error provenance
//! - [`HttpStatusCode`] for classifying authentication responses
//! - [`Credentials`] for bearer tokens that must never reach a log line

pub mod credentials;
pub mod error;
pub mod http_status;

pub use credentials::Credentials;
pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;

#[cfg(test)]
mod tests;
