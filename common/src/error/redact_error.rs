use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Returned by `Serialize` impls of secret-bearing types.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Redacted Serialization Error: {type_name} must be written through an explicit accessor {location}")]
    Serialization {
        type_name: &'static str,
        location: ErrorLocation,
    },
}
