//! Data model for the embedded content bridge.
//!
//! This crate contains the values that cross the host/content boundary:
//! locales and launch settings going in, [`Event`]s coming out of the
//! content and [`Command`]s going back. Nothing here performs I/O.
//!
//! ## Architecture
//!
//! - **common**: Error provenance, status codes, credentials
//! - **models** (this crate): Wire-level data and its encoding
//! - **bridge-core**: Launch state machine, request context, event channel
//! - **launcher**: Headless host binary wiring everything together

pub mod command;
pub mod error;
pub mod event;
pub mod headers;
pub mod launch_config;
pub mod locale;
pub mod request_id;

pub use command::Command;
pub use error::model_error::ModelError;
pub use event::Event;
pub use headers::HeaderSet;
pub use launch_config::LaunchConfig;
pub use locale::Locale;
pub use request_id::RequestId;

#[cfg(test)]
mod tests;
