//! Bearer credentials with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// Opaque bearer token exchanged for a session URL.
///
/// Immutable: rotation replaces the whole value. The token never shows up in
/// `Debug`/`Display` output and is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Raw token for transmission.
    ///
    /// Only call this when building the authentication body or a
    /// credential update command.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Token length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.token.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials([REDACTED])")
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED CREDENTIALS]")
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

// Wire formats must call token() explicitly
impl serde::Serialize for Credentials {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            type_name: "Credentials",
            location: ErrorLocation::here(),
        }))
    }
}
